use wirebind_core_types::RequestBody;

/// Outcome of the pre-request gate, exhaustively matched by the binder.
#[derive(Clone, Debug, PartialEq)]
pub enum GateDecision {
    /// Blocking configuration error; the user was already notified and no
    /// request may be made.
    Abort,
    /// The user declined the confirmation prompt. Expected control flow,
    /// nothing else happens.
    Cancelled,
    /// Confirm-only binding: navigate directly, bypassing the request and
    /// every lifecycle hook.
    Navigate { url: String },
    /// Proceed to the request coordinator with the resolved target.
    Execute { url: String, body: RequestBody },
}
