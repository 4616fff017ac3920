// ============================================================================
// Aggregate Pattern - Command -> Events -> State
// ============================================================================
//
// 1. Commands are validated against the current state before anything changes
// 2. Validated commands yield events describing what happened
// 3. State only changes by applying events
//
// A rejected command leaves the aggregate untouched.
//
// ============================================================================

/// Generic aggregate trait
///
/// Type Parameters:
/// - `Event`: The fact type produced by this aggregate
/// - `Command`: The intent type accepted by this aggregate
/// - `Error`: Business rule violations
pub trait Aggregate: Sized + Send + Sync {
    type Event;
    type Command;
    type Error;

    /// Apply an event to update state
    fn apply_event(&mut self, event: &Self::Event);

    /// Validate a command and emit events (business logic)
    fn handle_command(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error>;

    /// Handle a command and apply its events in one step
    fn execute(&mut self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        let events = self.handle_command(command)?;
        for event in &events {
            self.apply_event(event);
        }
        Ok(events)
    }
}
