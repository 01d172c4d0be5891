use crate::route::Position;

/// Result of applying one navigation to a visit stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryStep {
    pub stack: Vec<String>,
    /// Index of the previous identifier in the stack before the update.
    pub previous: Option<Position>,
    /// Index of the next identifier in the updated stack.
    pub next: Position,
    pub mutated: bool,
}

/// Computes the stack that follows navigating to `next`, without touching
/// `stack`. Unseen identifiers are pushed; a revisit truncates after its last
/// occurrence. `capacity` bounds the length by dropping the oldest entries.
pub fn apply(stack: &[String], previous: Option<&str>, next: &str, capacity: usize) -> HistoryStep {
    let previous = previous.map(|prev| {
        stack
            .iter()
            .rposition(|entry| entry == prev)
            .unwrap_or(stack.len().saturating_sub(1))
    });

    if let Some(index) = stack.iter().rposition(|entry| entry == next) {
        return HistoryStep {
            stack: stack[..=index].to_vec(),
            previous,
            next: index,
            mutated: index + 1 != stack.len(),
        };
    }

    let mut updated = Vec::with_capacity(stack.len() + 1);
    updated.extend_from_slice(stack);
    updated.push(next.to_string());

    let overflow = updated.len().saturating_sub(capacity.max(1));
    updated.drain(..overflow);

    HistoryStep {
        next: updated.len() - 1,
        previous: previous.map(|index| index.saturating_sub(overflow)),
        stack: updated,
        mutated: true,
    }
}
