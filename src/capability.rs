//! Execution-context detection and capability gating.
//!
//! External capabilities (the language model, speech synthesis, speech
//! recognition) are injected at construction as an explicit
//! [`Capability`] value instead of being probed from ambient globals at
//! call time.  Call sites branch on the closed set of variants:
//!
//! * [`Capability::Supported`] — holds the live backend handle.
//! * [`Capability::Unsupported`] — the capability is absent in this
//!   execution context; every operation fails fast.
//!
//! [`ExecutionContext`] captures whether the process is running
//! interactively at all.  A non-interactive context (server-side render,
//! batch job, piped stdio) never gets a working model or voice channel,
//! no matter what credentials are configured.

use std::io::IsTerminal;

// ---------------------------------------------------------------------------
// ExecutionContext
// ---------------------------------------------------------------------------

/// Whether the process is attached to an interactive session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionContext {
    /// Attached to a live user session; external capabilities may work.
    Interactive,
    /// Headless / piped execution; all external capabilities refuse to
    /// initialise.
    NonInteractive,
}

impl ExecutionContext {
    /// Detect the context from the process's standard streams.
    ///
    /// Both stdin and stdout must be terminals for the context to count as
    /// interactive.
    pub fn detect() -> Self {
        if std::io::stdin().is_terminal() && std::io::stdout().is_terminal() {
            ExecutionContext::Interactive
        } else {
            ExecutionContext::NonInteractive
        }
    }

    /// Returns `true` for [`ExecutionContext::Interactive`].
    pub fn is_interactive(&self) -> bool {
        matches!(self, ExecutionContext::Interactive)
    }
}

// ---------------------------------------------------------------------------
// Capability
// ---------------------------------------------------------------------------

/// A platform capability that is either present (with its handle) or absent.
///
/// Constructed once by the embedder and handed to the component that needs
/// it; the component never probes the platform itself.
#[derive(Debug, Clone)]
pub enum Capability<T> {
    /// The capability is available; `T` is the backend handle.
    Supported(T),
    /// The capability is absent in this execution context.
    Unsupported,
}

impl<T> Capability<T> {
    /// Returns `true` when the capability is present.
    pub fn is_supported(&self) -> bool {
        matches!(self, Capability::Supported(_))
    }

    /// Borrow the backend handle, or `None` when unsupported.
    pub fn as_supported(&self) -> Option<&T> {
        match self {
            Capability::Supported(handle) => Some(handle),
            Capability::Unsupported => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
