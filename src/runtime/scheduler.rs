//! Priority-based scheduler for binding units.

use crate::stage::{BindingUnit, StageId, StageRegistry, StageResult};
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::Arc;

/// A unit of work in the scheduler queue.
#[derive(Clone, Debug)]
pub struct WorkItem {
    pub unit: BindingUnit,
    /// The stage to execute.
    pub stage_id: StageId,
}

impl WorkItem {
    pub fn new(unit: BindingUnit, stage_id: StageId) -> Self {
        Self { unit, stage_id }
    }
}

// Lower stage_num = higher priority, so every header is parsed before any
// is rendered.
impl Eq for WorkItem {}

impl PartialEq for WorkItem {
    fn eq(&self, other: &Self) -> bool {
        self.unit.stage_num == other.unit.stage_num && self.stage_id == other.stage_id
    }
}

impl Ord for WorkItem {
    fn cmp(&self, other: &Self) -> Ordering {
        match other.unit.stage_num.cmp(&self.unit.stage_num) {
            Ordering::Equal => other.stage_id.cmp(&self.stage_id),
            ord => ord,
        }
    }
}

impl PartialOrd for WorkItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Priority-based scheduler using a binary heap.
pub struct PriorityScheduler {
    queue: BinaryHeap<WorkItem>,
    registry: Arc<StageRegistry>,
    total_enqueued: usize,
    total_processed: usize,
}

impl PriorityScheduler {
    pub fn new(registry: Arc<StageRegistry>) -> Self {
        Self {
            queue: BinaryHeap::new(),
            registry,
            total_enqueued: 0,
            total_processed: 0,
        }
    }

    pub fn enqueue(&mut self, item: WorkItem) {
        self.queue.push(item);
        self.total_enqueued += 1;
    }

    /// Process the next work item and return the result.
    ///
    /// Returns `None` only if the queue is empty.
    pub fn process_next(&mut self) -> Option<StageResult> {
        let item = self.queue.pop()?;
        let result = self.registry.dispatch(item.stage_id, item.unit);
        self.total_processed += 1;
        Some(result)
    }

    /// Enqueue the follow-up stages a result requested.
    ///
    /// Returns the unit back when it is finished (no requests, or failed).
    pub fn enqueue_requests(&mut self, result: StageResult) -> Option<BindingUnit> {
        if result.requests.is_empty() || result.unit.is_failed() {
            return Some(result.unit);
        }
        let mut requests = result.requests.into_iter();
        let last = requests.next_back();
        for stage_id in requests {
            self.enqueue(WorkItem::new(result.unit.clone(), stage_id));
        }
        if let Some(stage_id) = last {
            self.enqueue(WorkItem::new(result.unit, stage_id));
        }
        None
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn total_processed(&self) -> usize {
        self.total_processed
    }

    pub fn total_enqueued(&self) -> usize {
        self.total_enqueued
    }

    /// Empty the queue, returning the units that were still waiting.
    pub fn drain_units(&mut self) -> Vec<BindingUnit> {
        self.queue.drain().map(|item| item.unit).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_unit(name: &str, stage: u32) -> BindingUnit {
        let mut unit = BindingUnit::new(name, "");
        unit.stage_num = stage;
        unit
    }

    #[test]
    fn test_priority_ordering() {
        let item1 = WorkItem::new(make_unit("a", 2), StageId::RenderDart);
        let item2 = WorkItem::new(make_unit("b", 0), StageId::Parse);
        let item3 = WorkItem::new(make_unit("c", 3), StageId::RenderSwift);

        assert!(item2 > item1);
        assert!(item2 > item3);
        assert!(item1 > item3);

        let validate = WorkItem::new(make_unit("d", 1), StageId::Validate);
        let render = WorkItem::new(make_unit("d", 1), StageId::RenderDart);
        assert!(validate > render);
    }

    #[test]
    fn test_scheduler_ordering() {
        let registry = Arc::new(StageRegistry::new());
        let mut scheduler = PriorityScheduler::new(registry);

        scheduler.enqueue(WorkItem::new(make_unit("a", 2), StageId::RenderDart));
        scheduler.enqueue(WorkItem::new(make_unit("b", 0), StageId::Parse));
        scheduler.enqueue(WorkItem::new(make_unit("c", 3), StageId::RenderSwift));

        let order: Vec<String> = std::iter::from_fn(|| scheduler.process_next())
            .map(|result| result.unit.name)
            .collect();
        assert_eq!(order, vec!["b", "a", "c"]);
        assert_eq!(scheduler.total_processed(), 3);
    }

    #[test]
    fn test_drain_units() {
        let registry = Arc::new(StageRegistry::new());
        let mut scheduler = PriorityScheduler::new(registry);
        scheduler.enqueue(WorkItem::new(make_unit("a", 1), StageId::Validate));
        scheduler.enqueue(WorkItem::new(make_unit("b", 0), StageId::Parse));

        let mut names: Vec<_> = scheduler.drain_units().into_iter().map(|u| u.name).collect();
        names.sort();
        assert_eq!(names, vec!["a", "b"]);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_process_and_enqueue_requests() {
        let registry = Arc::new(StageRegistry::new_with_defaults());
        let mut scheduler = PriorityScheduler::new(registry);
        scheduler.enqueue(WorkItem::new(
            BindingUnit::new("two", include_str!("../../fixtures/two_structs_binding.h")),
            StageId::Parse,
        ));

        let mut finished = Vec::new();
        while let Some(result) = scheduler.process_next() {
            if let Some(unit) = scheduler.enqueue_requests(result) {
                finished.push(unit);
            }
        }

        assert_eq!(finished.len(), 1);
        assert!(finished[0].dart.is_some());
        assert_eq!(scheduler.total_processed(), 3);
        assert_eq!(scheduler.total_enqueued(), 3);
    }
}
