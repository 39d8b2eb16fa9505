//! Activity notifications and the monitor contract.
//!
//! Systems push [`Activity`] records into [`PendingActivities`]; the runner
//! forwards them to the caller's [`Monitor`] after every step, preserving the
//! order in which they were raised.

use bevy_ecs::prelude::Resource;

use crate::location::Location;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActorKind {
    Rider,
    Driver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActivityKind {
    Request,
    Cancel,
    Pickup,
    Dropoff,
}

/// One thing that happened to one actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activity {
    pub timestamp: u64,
    pub actor: ActorKind,
    pub kind: ActivityKind,
    pub actor_id: String,
    pub location: Location,
}

impl Activity {
    pub fn new(
        timestamp: u64,
        actor: ActorKind,
        kind: ActivityKind,
        actor_id: impl Into<String>,
        location: Location,
    ) -> Self {
        Self {
            timestamp,
            actor,
            kind,
            actor_id: actor_id.into(),
            location,
        }
    }
}

/// Receives activity notifications in event-processing order.
pub trait Monitor {
    fn notify(&mut self, activity: Activity);
}

impl Monitor for Vec<Activity> {
    fn notify(&mut self, activity: Activity) {
        self.push(activity);
    }
}

impl<M: Monitor + ?Sized> Monitor for &mut M {
    fn notify(&mut self, activity: Activity) {
        (**self).notify(activity);
    }
}

/// Monitor that keeps every activity for later inspection.
#[derive(Debug, Clone, Default)]
pub struct ActivityLog {
    activities: Vec<Activity>,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    pub fn count(&self, actor: ActorKind, kind: ActivityKind) -> usize {
        self.activities
            .iter()
            .filter(|activity| activity.actor == actor && activity.kind == kind)
            .count()
    }

    /// Activities of one actor, oldest first.
    pub fn for_actor<'a>(
        &'a self,
        actor: ActorKind,
        actor_id: &'a str,
    ) -> impl Iterator<Item = &'a Activity> + 'a {
        self.activities
            .iter()
            .filter(move |activity| activity.actor == actor && activity.actor_id == actor_id)
    }
}

impl Monitor for ActivityLog {
    fn notify(&mut self, activity: Activity) {
        self.activities.push(activity);
    }
}

/// Notifications raised during the current step, not yet forwarded.
#[derive(Debug, Default, Resource)]
pub struct PendingActivities(Vec<Activity>);

impl PendingActivities {
    pub fn push(&mut self, activity: Activity) {
        self.0.push(activity);
    }

    pub fn drain(&mut self) -> std::vec::Drain<'_, Activity> {
        self.0.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
