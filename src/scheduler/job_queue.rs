/***************************************/
/*        3rd party libraries          */
/***************************************/
use std::collections::BTreeMap;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::shared::Request;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueOrder {
    Ascending,
    Descending,
}

/**
 * Requests ordered by floor, ascending or descending.
 *
 * Keyed by `(floor, id)` so two requests on the same floor both stay queued. Equal floors
 * come out in creation order.
 */
#[derive(Debug, Clone)]
pub struct JobQueue {
    order: QueueOrder,
    jobs: BTreeMap<(i64, u64), Request>,
}

impl JobQueue {
    pub fn new(order: QueueOrder) -> JobQueue {
        JobQueue {
            order,
            jobs: BTreeMap::new(),
        }
    }

    fn key(&self, request: &Request) -> (i64, u64) {
        let floor = i64::from(request.floor_number());
        match self.order {
            QueueOrder::Ascending => (floor, request.id()),
            QueueOrder::Descending => (-floor, request.id()),
        }
    }

    pub fn push(&mut self, request: Request) {
        let key = self.key(&request);
        self.jobs.insert(key, request);
    }

    /// Removes `request` if queued, returning whether it was.
    pub fn remove(&mut self, request: &Request) -> bool {
        let key = self.key(request);
        self.jobs.remove(&key).is_some()
    }

    pub fn peek(&self) -> Option<&Request> {
        self.jobs.values().next()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Moves every request into `target`, leaving `self` empty.
    pub fn drain_into(&mut self, target: &mut JobQueue) {
        for (_, request) in std::mem::take(&mut self.jobs) {
            target.push(request);
        }
    }

    /// Queued floors in priority order.
    pub fn floors(&self) -> Vec<i32> {
        self.jobs.values().map(Request::floor_number).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::Direction;

    #[test]
    fn test_ascending_and_descending_order() {
        // Arrange
        let mut up = JobQueue::new(QueueOrder::Ascending);
        let mut down = JobQueue::new(QueueOrder::Descending);

        // Act
        for floor in [4, -2, 9, 0] {
            up.push(Request::new(floor, Direction::None));
            down.push(Request::new(floor, Direction::None));
        }

        // Assert
        assert_eq!(up.floors(), vec![-2, 0, 4, 9]);
        assert_eq!(down.floors(), vec![9, 4, 0, -2]);
        assert_eq!(up.peek().map(Request::floor_number), Some(-2));
        assert_eq!(down.peek().map(Request::floor_number), Some(9));
    }

    #[test]
    fn test_same_floor_requests_are_kept_apart() {
        // Arrange
        let mut queue = JobQueue::new(QueueOrder::Descending);
        let first = Request::new(3, Direction::Down);
        let second = Request::new(3, Direction::None);
        queue.push(first.clone());
        queue.push(second.clone());

        // Act
        let removed = queue.remove(&second);

        // Assert
        assert!(removed);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.peek(), Some(&first));
        assert!(!queue.remove(&second));
    }

    #[test]
    fn test_drain_into_empties_source() {
        // Arrange
        let mut pending = JobQueue::new(QueueOrder::Ascending);
        let mut active = JobQueue::new(QueueOrder::Ascending);
        pending.push(Request::new(2, Direction::Up));
        pending.push(Request::new(1, Direction::Up));
        active.push(Request::new(5, Direction::Up));

        // Act
        pending.drain_into(&mut active);

        // Assert
        assert!(pending.is_empty());
        assert_eq!(active.floors(), vec![1, 2, 5]);
    }
}
