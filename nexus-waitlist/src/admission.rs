//! Admission control loop around the waitlist.
//!
//! The waitlist is a passive container. [`Admission`] is the caller that
//! drives it: it authenticates users through an [`Authenticator`], asks a
//! [`SpaceAllocator`] for a space, and parks users in the waitlist (ranked
//! by [`UserClass`]) when none is free. When a space is released the head of
//! the waitlist is promoted.
//!
//! Credential stores, user registries and space bookkeeping are provided
//! by the host through the traits below.
//!
//! ```
//! use nexus_waitlist::admission::{
//!     Admission, AuthOutcome, Authenticator, Classifier, Placement, SpaceAllocator,
//! };
//! use nexus_waitlist::{UserClass, WaitlistConfig};
//!
//! struct OpenDoor;
//! impl Authenticator for OpenDoor {
//!     fn authenticate(&self, _id: &str, _secret: &str) -> AuthOutcome {
//!         AuthOutcome::Success
//!     }
//! }
//!
//! struct Everyone;
//! impl Classifier for Everyone {
//!     fn classify(&self, _id: &str) -> UserClass {
//!         UserClass::Internal
//!     }
//! }
//!
//! struct Lot { free: usize }
//! impl SpaceAllocator for Lot {
//!     fn try_allocate_space(&mut self) -> bool {
//!         if self.free == 0 { return false; }
//!         self.free -= 1;
//!         true
//!     }
//!     fn release_space(&mut self) {
//!         self.free += 1;
//!     }
//! }
//!
//! let mut admission = Admission::new(OpenDoor, Everyone, Lot { free: 1 }, WaitlistConfig::default());
//!
//! let alice = admission.login("alice", "pw").unwrap();
//! let bob = admission.login("bob", "pw").unwrap();
//!
//! assert_eq!(admission.request_space(&alice).unwrap(), Placement::Allocated);
//! assert_eq!(admission.request_space(&bob).unwrap(), Placement::Waiting { position: 1 });
//!
//! let promoted = admission.release_space(&alice).unwrap();
//! assert_eq!(promoted.unwrap().id(), "bob");
//! assert!(admission.holds_space("bob"));
//! ```

use std::collections::HashSet;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{Entry, UserClass, Waitlist, WaitlistConfig, WaitlistError};

/// Result of a credential check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOutcome {
    /// Credentials match.
    Success,
    /// No user with this id is registered.
    NoSuchUser,
    /// The user exists but the secret is wrong.
    WrongSecret,
    /// Id or secret failed basic validation.
    InvalidFields,
}

impl core::fmt::Display for AuthOutcome {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let text = match self {
            Self::Success => "success",
            Self::NoSuchUser => "no such user",
            Self::WrongSecret => "wrong secret",
            Self::InvalidFields => "invalid fields",
        };
        f.write_str(text)
    }
}

/// Verifies user credentials.
pub trait Authenticator {
    /// Checks `secret` against the record for `id`.
    fn authenticate(&self, id: &str, secret: &str) -> AuthOutcome;
}

/// Maps a user id to its class.
pub trait Classifier {
    /// Returns the class of `id`. Unknown ids are the host's call.
    fn classify(&self, id: &str) -> UserClass;
}

/// Space bookkeeping for a parking lot.
pub trait SpaceAllocator {
    /// Claims a free space. Returns `false` when the lot is full.
    fn try_allocate_space(&mut self) -> bool;

    /// Returns a previously claimed space to the pool.
    fn release_space(&mut self);
}

/// An authenticated user.
///
/// Sessions are plain values handed back by [`Admission::login`] and passed
/// to each operation that acts on behalf of a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    id: String,
    class: UserClass,
}

impl Session {
    /// Returns the user id.
    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the user's class.
    #[inline]
    pub fn class(&self) -> UserClass {
        self.class
    }
}

/// Outcome of a space request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// A space was claimed for the user.
    Allocated,
    /// The user is waiting at this 1-based position.
    Waiting {
        /// Position counted from the head.
        position: usize,
    },
}

/// Errors returned by [`Admission`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum AdmissionError {
    /// Login failed.
    #[error("login rejected: {0}")]
    Rejected(AuthOutcome),

    /// A waitlist operation failed.
    #[error(transparent)]
    Waitlist(#[from] WaitlistError),

    /// The user does not hold a space.
    #[error("user '{0}' does not hold a space")]
    NotHolder(String),
}

/// Drives a [`Waitlist`] from authentication and space allocation.
pub struct Admission<A, C, S> {
    authenticator: A,
    classifier: C,
    spaces: S,
    holders: HashSet<String>,
    waitlist: Waitlist<UserClass>,
}

impl<A, C, S> Admission<A, C, S>
where
    A: Authenticator,
    C: Classifier,
    S: SpaceAllocator,
{
    /// Creates a driver with an empty waitlist.
    pub fn new(authenticator: A, classifier: C, spaces: S, config: WaitlistConfig) -> Self {
        Self {
            authenticator,
            classifier,
            spaces,
            holders: HashSet::new(),
            waitlist: Waitlist::with_config(config),
        }
    }

    /// Returns the waitlist.
    #[inline]
    pub fn waitlist(&self) -> &Waitlist<UserClass> {
        &self.waitlist
    }

    /// Returns the space allocator.
    #[inline]
    pub fn spaces(&self) -> &S {
        &self.spaces
    }

    /// Returns `true` if `id` currently holds a space.
    #[inline]
    pub fn holds_space(&self, id: &str) -> bool {
        self.holders.contains(id)
    }

    /// Authenticates `id` and opens a session for it.
    ///
    /// # Errors
    ///
    /// Returns [`AdmissionError::Rejected`] with the authenticator's outcome
    /// for anything other than [`AuthOutcome::Success`].
    pub fn login(&self, id: &str, secret: &str) -> Result<Session, AdmissionError> {
        match self.authenticator.authenticate(id, secret) {
            AuthOutcome::Success => {
                let class = self.classifier.classify(id);
                debug!(user = id, %class, "login accepted");
                Ok(Session {
                    id: id.to_string(),
                    class,
                })
            }
            outcome => {
                warn!(user = id, %outcome, "login rejected");
                Err(AdmissionError::Rejected(outcome))
            }
        }
    }

    /// Claims a space for the session's user, or parks them in the waitlist.
    ///
    /// A user already holding a space gets `Allocated` back without claiming
    /// a second one. A user already waiting keeps their entry and gets their
    /// current position back. New waiters are ranked by class, with arrival order
    /// breaking ties.
    ///
    /// # Errors
    ///
    /// Returns [`AdmissionError::Waitlist`] if the enqueue is rejected.
    pub fn request_space(&mut self, session: &Session) -> Result<Placement, AdmissionError> {
        if self.holders.contains(session.id()) {
            debug!(user = session.id(), "already holds a space");
            return Ok(Placement::Allocated);
        }

        if let Some(position) = self.waitlist.query_position(session.id()) {
            debug!(user = session.id(), position, "already waiting");
            return Ok(Placement::Waiting { position });
        }

        if self.spaces.try_allocate_space() {
            self.holders.insert(session.id().to_string());
            debug!(user = session.id(), "space allocated");
            return Ok(Placement::Allocated);
        }

        self.waitlist.enqueue(session.id(), session.class())?;
        self.waitlist.sort_by_priority();

        let position = self
            .waitlist
            .query_position(session.id())
            .ok_or_else(|| WaitlistError::NotFound(session.id().to_string()))?;
        debug!(
            user = session.id(),
            class = %session.class(),
            position,
            waiting = self.waitlist.len(),
            "lot full, user waiting"
        );
        Ok(Placement::Waiting { position })
    }

    /// Releases the session's space and promotes the next waiter.
    ///
    /// Returns the promoted entry, if any.
    ///
    /// # Errors
    ///
    /// Returns [`AdmissionError::NotHolder`] if the user holds no space,
    /// whether they are still waiting or never asked for one. Neither the
    /// allocator nor the waitlist is touched in that case.
    pub fn release_space(
        &mut self,
        session: &Session,
    ) -> Result<Option<Entry<UserClass>>, AdmissionError> {
        if !self.holders.remove(session.id()) {
            warn!(user = session.id(), "release by non-holder");
            return Err(AdmissionError::NotHolder(session.id().to_string()));
        }

        self.spaces.release_space();
        debug!(user = session.id(), "space released");
        Ok(self.promote_next())
    }

    /// Hands a free space to the head of the waitlist.
    ///
    /// Returns `None` when nobody is waiting or the allocator has no space.
    pub fn promote_next(&mut self) -> Option<Entry<UserClass>> {
        if self.waitlist.is_empty() || !self.spaces.try_allocate_space() {
            return None;
        }

        let entry = self.waitlist.pop_front()?;
        self.holders.insert(entry.id().to_string());
        info!(
            user = entry.id(),
            class = %entry.priority(),
            waiting = self.waitlist.len(),
            "promoted from waitlist"
        );
        Some(entry)
    }

    /// Takes the session's user out of the waitlist.
    ///
    /// # Errors
    ///
    /// Returns [`AdmissionError::Waitlist`] wrapping
    /// [`WaitlistError::NotFound`] if the user is not waiting, for example
    /// because they were promoted first.
    pub fn withdraw(&mut self, session: &Session) -> Result<(), AdmissionError> {
        let entry = self.waitlist.remove(session.id())?;
        debug!(user = entry.id(), "withdrawn from waitlist");
        Ok(())
    }
}
