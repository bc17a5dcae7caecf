use strum::Display;

/// Side-effecting requests emitted by widgets.
///
/// Widgets only mutate the in-memory state they are handed. Anything that
/// talks to the backend or the broker is returned as an `Action` and
/// performed by the shell once the state lock has been released.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum Action {
    /// Register, log in and connect to the broadcast channel.
    Signup,
    /// Move the current message into the send queue.
    SendMessage,
    /// Reload the contact list from the backend.
    RefreshContacts,
    /// Look up contact hints for the current search input.
    SearchContacts,
    /// Add the given login as a contact.
    AddFriend(String),
    Quit,
}
