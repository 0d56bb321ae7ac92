//! Read-only world view handed to the autopilot each tick.

use tankgrid_arena::Arena;
use tankgrid_core::components::{Bullet, EnemyTank, PlayerTank, PowerUp};
use tankgrid_core::enums::Shooter;

/// Everything the decision pipeline may look at. Nothing here is mutable;
/// the pipeline answers with an action and the simulation applies it.
#[derive(Debug, Clone, Copy)]
pub struct WorldView<'a> {
    pub arena: &'a Arena,
    /// The tank being driven.
    pub me: &'a PlayerTank,
    /// The other player tank.
    pub partner: Option<&'a PlayerTank>,
    pub enemies: &'a [EnemyTank],
    pub bullets: &'a [Bullet],
    pub power_up: Option<&'a PowerUp>,
    /// Remaining clock freeze on enemies.
    pub frozen_ticks: u32,
    pub tick: u64,
}

impl<'a> WorldView<'a> {
    pub fn alive_enemies(&self) -> impl Iterator<Item = &'a EnemyTank> + 'a {
        self.enemies.iter().filter(|e| e.hull.alive)
    }

    pub fn enemy_bullets(&self) -> impl Iterator<Item = &'a Bullet> + 'a {
        self.bullets.iter().filter(|b| b.owner.is_enemy())
    }

    pub fn has_enemy_bullets(&self) -> bool {
        self.enemy_bullets().next().is_some()
    }

    /// Bullets of the driven tank still in flight.
    pub fn own_bullets_in_flight(&self) -> usize {
        let owner = Shooter::Player(self.me.slot);
        self.bullets.iter().filter(|b| b.owner == owner).count()
    }

    /// The weapon is ready: alive, allowed to shoot, cooled down, and under
    /// the in-flight cap.
    pub fn weapon_ready(&self) -> bool {
        self.me.hull.alive
            && self.me.can_shoot
            && self.me.bullet_cooldown == 0
            && self.own_bullets_in_flight() < self.me.max_bullets()
    }

    pub fn enemy(&self, id: u32) -> Option<&'a EnemyTank> {
        self.enemies.iter().find(|e| e.id == id)
    }
}
