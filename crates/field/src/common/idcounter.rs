use crate::NodeId;
use crate::common::error::FieldError;

/// Hands out graph node ids in increasing order.
///
/// Zero is never produced; it is reserved for "unassigned" and for the synthetic
/// root that may anchor several root resources. `u64::MAX` is never produced either,
/// so every id handed out has a successor.
#[derive(Debug, Clone)]
pub struct IdCounter {
    value: u64,
}

impl Default for IdCounter {
    fn default() -> Self {
        Self { value: 1 }
    }
}

impl IdCounter {
    /// Creates a counter whose first id is `first` (or 1 if `first` is zero).
    pub fn starting_at(first: u64) -> Self {
        Self {
            value: first.max(1),
        }
    }

    /// Makes sure the next produced id is strictly greater than `id`.
    pub fn raise_above(&mut self, id: NodeId) -> crate::Result<()> {
        let above = id
            .as_num()
            .checked_add(1)
            .ok_or(FieldError::IdsExhausted(id))?;
        self.value = self.value.max(above);
        Ok(())
    }

    /// The id the next call of [`IdCounter::next`] will return.
    #[inline]
    pub fn peek(&self) -> NodeId {
        NodeId::new(self.value)
    }

    /// Number of ids that can still be handed out.
    #[inline]
    pub fn remaining(&self) -> u64 {
        u64::MAX - self.value
    }

    pub fn next(&mut self) -> crate::Result<NodeId> {
        let value = self.value;
        if value == u64::MAX {
            return Err(FieldError::IdsExhausted(NodeId::new(value)));
        }
        self.value = value + 1;
        Ok(NodeId::new(value))
    }
}

#[cfg(test)]
mod test {
    use super::IdCounter;
    use crate::NodeId;
    use crate::common::error::FieldError;

    #[test]
    fn test_counter_skips_zero() {
        let mut counter = IdCounter::starting_at(0);
        assert_eq!(counter.next().unwrap(), NodeId::new(1));
        assert_eq!(counter.next().unwrap(), NodeId::new(2));
    }

    #[test]
    fn test_counter_raise_above() {
        let mut counter = IdCounter::starting_at(5);
        counter.raise_above(NodeId::new(2)).unwrap();
        assert_eq!(counter.peek(), NodeId::new(5));
        counter.raise_above(NodeId::new(10)).unwrap();
        assert_eq!(counter.next().unwrap(), NodeId::new(11));
    }

    #[test]
    fn test_counter_exhausted() {
        let mut counter = IdCounter::default();
        assert!(matches!(
            counter.raise_above(NodeId::new(u64::MAX)),
            Err(FieldError::IdsExhausted(_))
        ));
        assert_eq!(counter.peek(), NodeId::new(1));

        let mut counter = IdCounter::starting_at(u64::MAX - 2);
        assert_eq!(counter.remaining(), 2);
        assert_eq!(counter.next().unwrap(), NodeId::new(u64::MAX - 2));
        assert_eq!(counter.next().unwrap(), NodeId::new(u64::MAX - 1));
        assert_eq!(counter.remaining(), 0);
        assert!(counter.next().is_err());
        assert_eq!(counter.peek(), NodeId::new(u64::MAX));
    }
}
