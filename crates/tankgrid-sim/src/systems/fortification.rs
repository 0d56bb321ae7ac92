//! Base fortification cycle started by the shovel.
//!
//! `Idle -> Fortifying -> Alternating -> Restoring -> Idle`, one step per
//! tick. The ring is rewritten only on transitions.

use log::debug;

use tankgrid_core::components::Fortification;
use tankgrid_core::constants::*;
use tankgrid_core::enums::WallMaterial;

use crate::world::World;

/// Start (or restart) the cycle: the ring turns to steel.
pub fn start(world: &mut World) {
    if world.fortification.is_active() {
        debug!("fortification restarted from {:?}", world.fortification);
    }
    world.fortification = Fortification::Fortifying { remaining: FORTIFY_TICKS };
    world.arena.set_fortification_ring(WallMaterial::Steel);
}

/// Drop the cycle without touching the walls.
pub fn cancel(world: &mut World) {
    world.fortification = Fortification::Idle;
}

fn flip(material: WallMaterial) -> WallMaterial {
    match material {
        WallMaterial::Brick => WallMaterial::Steel,
        WallMaterial::Steel => WallMaterial::Brick,
    }
}

/// Advance the cycle by one tick.
pub fn advance(world: &mut World) {
    let next = match world.fortification {
        Fortification::Idle => return,
        Fortification::Fortifying { remaining } if remaining > 1 => {
            Fortification::Fortifying { remaining: remaining - 1 }
        }
        Fortification::Fortifying { .. } => {
            world.arena.set_fortification_ring(WallMaterial::Brick);
            Fortification::Alternating {
                material: WallMaterial::Brick,
                remaining: FORTIFY_ALTERNATE_TICKS,
                cycles_left: FORTIFY_ALTERNATE_CYCLES,
            }
        }
        Fortification::Alternating {
            material,
            remaining,
            cycles_left,
        } if remaining > 1 => Fortification::Alternating {
            material,
            remaining: remaining - 1,
            cycles_left,
        },
        Fortification::Alternating {
            material,
            cycles_left,
            ..
        } => {
            if cycles_left <= 1 {
                Fortification::Restoring
            } else {
                let material = flip(material);
                world.arena.set_fortification_ring(material);
                Fortification::Alternating {
                    material,
                    remaining: FORTIFY_ALTERNATE_TICKS,
                    cycles_left: cycles_left - 1,
                }
            }
        }
        Fortification::Restoring => {
            world.arena.set_fortification_ring(WallMaterial::Brick);
            Fortification::Idle
        }
    };

    if std::mem::discriminant(&next) != std::mem::discriminant(&world.fortification) {
        debug!("fortification {:?} -> {:?}", world.fortification, next);
    }
    world.fortification = next;
}
