use super::*;

/// Circular turn order over a fixed membership.
///
/// `current` always points at a live member. Membership and configuration
/// order never change after construction; only the pointer moves. The ring is
/// mutated from dispatcher-serialized code only, so it carries no lock.
#[derive(Debug, Clone)]
pub struct Ring<T> {
    members: Vec<T>,
    current: Position,
}

impl<T> Ring<T> {
    pub fn new(members: Vec<T>) -> Result<Self, ConfigError> {
        match members.is_empty() {
            true => Err(ConfigError::NoPlayers),
            false => Ok(Self {
                members,
                current: 0,
            }),
        }
    }
    pub fn size(&self) -> usize {
        self.members.len()
    }
    pub fn position(&self) -> Position {
        self.current
    }
    pub fn current(&self) -> &T {
        &self.members[self.current]
    }
    pub fn current_mut(&mut self) -> &mut T {
        &mut self.members[self.current]
    }
    /// Members in configuration order, starting from the original first.
    pub fn all(&self) -> std::slice::Iter<'_, T> {
        self.members.iter()
    }
    /// Round resets only.
    pub fn members_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.members.iter_mut()
    }
    pub fn count_where<F>(&self, predicate: F) -> usize
    where
        F: Fn(&T) -> bool,
    {
        self.members.iter().filter(|m| predicate(m)).count()
    }
    pub fn reset_to_first(&mut self) {
        self.current = 0;
    }
    /// Steps forward one seat at a time until a member satisfies the
    /// predicate. The current member is examined last.
    pub fn advance_to<F>(&mut self, predicate: F) -> Result<&T, Violation>
    where
        F: Fn(&T) -> bool,
    {
        let n = self.size();
        let next = (1..=n)
            .map(|step| (self.current + step) % n)
            .find(|&i| predicate(&self.members[i]))
            .ok_or(Violation::Exhausted)?;
        self.current = next;
        Ok(&self.members[next])
    }
}
