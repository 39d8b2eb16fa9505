//! Dispatcher: pairs rider requests with idle drivers and keeps the waiting list.

use bevy_ecs::prelude::{Entity, Resource};
use tracing::debug;

use crate::ecs::Rider;
use crate::queue::PriorityQueue;

/// Waiting-list key. Orders riders by request time, then creation sequence;
/// the entity keeps same-named riders distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WaitingRider {
    pub requested_at: u64,
    pub sequence: u64,
    pub entity: Entity,
}

impl WaitingRider {
    pub fn new(entity: Entity, rider: &Rider) -> Self {
        Self {
            requested_at: rider.requested_at,
            sequence: rider.sequence,
            entity,
        }
    }
}

#[derive(Debug, Default, Resource)]
pub struct Dispatcher {
    /// Registered drivers, in registration order.
    drivers: Vec<Entity>,
    waiting: PriorityQueue<WaitingRider>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `driver` to the pool. Returns `false` if it was already registered.
    pub fn register_driver(&mut self, driver: Entity) -> bool {
        if self.drivers.contains(&driver) {
            return false;
        }
        self.drivers.push(driver);
        true
    }

    pub fn is_registered(&self, driver: Entity) -> bool {
        self.drivers.contains(&driver)
    }

    pub fn drivers(&self) -> &[Entity] {
        &self.drivers
    }

    pub fn waiting(&self) -> &PriorityQueue<WaitingRider> {
        &self.waiting
    }

    pub fn is_waiting(&self, entity: Entity, rider: &Rider) -> bool {
        self.waiting.contains(&WaitingRider::new(entity, rider))
    }

    /// Finds the registered idle driver closest (in travel time) to the rider.
    ///
    /// `idle_travel_time` returns a driver's travel time to the rider's origin,
    /// or `None` when that driver is not idle. Ties go to the driver registered
    /// first. Without a candidate the rider joins the waiting list.
    pub fn request_driver<F>(&mut self, rider: WaitingRider, mut idle_travel_time: F) -> Option<Entity>
    where
        F: FnMut(Entity) -> Option<u64>,
    {
        let mut best: Option<(u64, Entity)> = None;
        for &driver in &self.drivers {
            let Some(travel_time) = idle_travel_time(driver) else {
                continue;
            };
            if best.map_or(true, |(best_time, _)| travel_time < best_time) {
                best = Some((travel_time, driver));
            }
        }

        match best {
            Some((travel_time, driver)) => {
                debug!(?driver, rider = ?rider.entity, travel_time, "driver assigned");
                Some(driver)
            }
            None => {
                self.waiting.push(rider);
                debug!(rider = ?rider.entity, waiting = self.waiting.len(), "no idle driver, rider queued");
                None
            }
        }
    }

    /// Hands `driver` the longest-waiting rider. With nobody waiting the driver
    /// joins the pool instead (once); a driver that finds a rider is not
    /// registered by this call.
    pub fn request_rider(&mut self, driver: Entity) -> Option<Entity> {
        if let Some(rider) = self.waiting.pop() {
            return Some(rider.entity);
        }
        if self.register_driver(driver) {
            debug!(?driver, "driver registered");
        }
        None
    }

    /// Takes the rider off the waiting list and cancels it if it is still waiting.
    /// Returns whether the rider was on the list. Already matched or cancelled
    /// riders are left unchanged.
    pub fn cancel_ride(&mut self, entity: Entity, rider: &mut Rider) -> bool {
        let removed = self.waiting.remove(&WaitingRider::new(entity, rider));
        rider.mark_cancelled();
        removed
    }
}
