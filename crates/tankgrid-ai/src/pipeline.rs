//! Autopilot decision pipeline.
//!
//! Each tick runs an ordered list of stages. A stage inspects the world
//! through a [`WorldView`], may steer a working copy of the tank's hull
//! (turns and grid snaps), and either resolves the tick with an [`Action`]
//! or falls through to the next stage:
//!
//! 1. hold a just-fired shot's facing
//! 2. close combat
//! 3. bullet safety (shoot down, dodge, safer route)
//! 4. clear a brick blocking the planned route
//! 5. power-up acquisition
//! 6. engage the priority enemy, or explore
//!
//! The pipeline never touches the world. Its answer is a [`Decision`]: the
//! steered hull plus the virtual key state for the mover.

use glam::{DVec2, IVec2};
use log::trace;

use tankgrid_arena::grid::Tile;
use tankgrid_arena::{plan_path, steel_between, Arena, BrickTarget};
use tankgrid_core::components::{Hull, PowerUp};
use tankgrid_core::constants::*;
use tankgrid_core::enums::{DangerLevel, PowerUpKind, RiskLevel, Strategy};
use tankgrid_core::input::InputIntent;
use tankgrid_core::state::{AutopilotView, PredictionView};
use tankgrid_core::types::{clamp_tank_position, Direction, Rect, TANK_MAX_COORD};

use crate::prediction;
use crate::targeting::{self, dominant_direction};
use crate::threat::{self, CollisionKind, PerpendicularScan, SafeHeading, DESTROY_TTC};
use crate::view::WorldView;

/// Power-up pursuit switches to the short-range heuristic inside this radius.
const SIMPLE_APPROACH_RANGE: f64 = 3.0;
/// Bricks are shot from closer than this; farther ones are approached first.
const BRICK_SHOT_RANGE: f64 = 2.5;
/// Invulnerability and freeze both above this make bullet safety moot.
const SAFE_WINDOW_TICKS: u32 = 60;
/// Danger above which a different heading is taken pre-emptively.
const MODERATE_DANGER: f64 = 30.0;
const LOW_DANGER: f64 = 10.0;

/// How a stage resolved the tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    pub strategy: Strategy,
    pub label: String,
    pub danger: DangerLevel,
    /// Hold the key for the hull's (final) facing.
    pub drive: bool,
    pub fire: bool,
    /// A bullet was dodged by changing heading.
    pub dodged: bool,
}

impl Action {
    fn new(strategy: Strategy, label: impl Into<String>, danger: DangerLevel) -> Self {
        Self {
            strategy,
            label: label.into(),
            danger,
            drive: false,
            fire: false,
            dodged: false,
        }
    }

    fn driving(mut self) -> Self {
        self.drive = true;
        self
    }

    fn firing(mut self) -> Self {
        self.fire = true;
        self
    }
}

/// Output of one pipeline run, applied by the simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    /// Hull after the pipeline's turns and snaps.
    pub hull: Hull,
    pub intent: InputIntent,
    pub dodged: bool,
}

/// Working state for one run: the view plus a hull the stages may steer.
pub struct Steering<'v, 'a> {
    pub view: &'v WorldView<'a>,
    pub hull: Hull,
    scan: PerpendicularScan,
}

impl Steering<'_, '_> {
    fn turn(&mut self, to: Direction) {
        self.hull.turn(to, self.view.tick);
    }

    fn position(&self) -> DVec2 {
        self.hull.position
    }
}

type Stage = fn(&mut Autopilot, &mut Steering) -> Option<Action>;

const STAGES: [(&str, Stage); 6] = [
    ("maintain_shot", Autopilot::maintain_shot),
    ("close_combat", Autopilot::close_combat),
    ("bullet_safety", Autopilot::bullet_safety),
    ("clear_path", Autopilot::clear_path),
    ("seek_power_up", Autopilot::seek_power_up),
    ("engage", Autopilot::engage),
];

/// Memory carried by the autopilot between ticks.
#[derive(Debug, Clone)]
pub struct Autopilot {
    pub enabled: bool,
    /// Ticks to keep facing the last shot's direction.
    shot_hold: u32,
    shot_direction: Option<Direction>,
    /// Ticks to keep driving before taking the next path turn.
    move_commit: u32,
    last_path_tick: Option<u64>,
    path: Vec<Direction>,
    /// Anchor the head of `path` starts from.
    path_anchor: IVec2,
    brick_blocked: bool,
    brick: Option<BrickTarget>,
    simple_approach: u32,
    seek_turn: u32,
    diagnostics: AutopilotView,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Autopilot {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            shot_hold: 0,
            shot_direction: None,
            move_commit: 0,
            last_path_tick: None,
            path: Vec::new(),
            path_anchor: IVec2::ZERO,
            brick_blocked: false,
            brick: None,
            simple_approach: AI_SIMPLE_APPROACH_TICKS,
            seek_turn: 0,
            diagnostics: AutopilotView {
                enabled,
                ..Default::default()
            },
        }
    }

    /// Forget everything but the enabled flag (level load, respawn).
    pub fn reset(&mut self) {
        *self = Self::new(self.enabled);
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        self.diagnostics.enabled = enabled;
    }

    /// Diagnostics from the latest run; statistics are filled by the caller.
    pub fn diagnostics(&self) -> &AutopilotView {
        &self.diagnostics
    }

    /// Run the pipeline. `None` when disabled or the tank is dead.
    pub fn decide(&mut self, view: &WorldView) -> Option<Decision> {
        if !self.enabled || !view.me.hull.alive {
            return None;
        }

        let mut steering = Steering {
            view,
            hull: view.me.hull.clone(),
            scan: PerpendicularScan::default(),
        };
        self.begin_tick(&mut steering);

        let mut resolved = None;
        for (name, stage) in STAGES {
            if let Some(action) = stage(self, &mut steering) {
                trace!("autopilot stage {name}: {:?} ({})", action.strategy, action.label);
                resolved = Some(action);
                break;
            }
        }
        let action = resolved.unwrap_or_else(|| Action::new(Strategy::Idle, "Idle", DangerLevel::Low));

        let d = &mut self.diagnostics;
        d.strategy = action.strategy;
        d.action = action.label.clone();
        d.danger = action.danger;
        d.path_length = self.path.len();
        d.brick_target = self.brick.map(|b| b.cell);

        let mut intent = InputIntent::default();
        if action.drive {
            intent.drive(Some(steering.hull.facing));
        }
        intent.fire = action.fire;
        Some(Decision {
            hull: steering.hull,
            intent,
            dodged: action.dodged,
        })
    }

    /// Per-tick bookkeeping before any stage runs: countdowns, the held shot
    /// facing, stale brick targets and the perpendicular-risk scan.
    fn begin_tick(&mut self, s: &mut Steering) {
        let d = &mut self.diagnostics;
        d.prediction = PredictionView::default();
        d.time_to_collision = None;
        d.target_enemy = None;

        if self.shot_hold > 0 {
            self.shot_hold -= 1;
            if let Some(direction) = self.shot_direction {
                s.turn(direction);
            }
        }
        self.simple_approach = self.simple_approach.saturating_sub(1);
        self.seek_turn = self.seek_turn.saturating_sub(1);
        self.move_commit = self.move_commit.saturating_sub(1);

        if let Some(brick) = self.brick {
            if !matches!(s.view.arena.tile(brick.cell), Tile::Brick(q) if q.is_alive()) {
                self.brick_blocked = false;
                self.brick = None;
                self.path.clear();
            }
        }

        s.scan = threat::scan_perpendicular(s.view, &s.hull);
        self.diagnostics.perpendicular_risk = s.scan.risk();
    }

    /// Record a shot in the current facing. `hold` keeps that facing for
    /// the shot cooldown.
    fn shoot(&mut self, s: &Steering, hold: bool) {
        if hold {
            self.shot_hold = AI_SHOOT_COOLDOWN;
        }
        self.shot_direction = Some(s.hull.facing);
    }

    /// Plan toward `target`, updating the brick-blocked state.
    fn replan(&mut self, s: &Steering, target: DVec2) -> Vec<Direction> {
        let plan = plan_path(s.view.arena, s.hull.physical, target);
        self.brick_blocked = plan.brick_blocked;
        self.brick = plan.brick;
        plan.steps
    }

    // ---- stage 1 -------------------------------------------------------

    fn maintain_shot(&mut self, s: &mut Steering) -> Option<Action> {
        let just_turned = s.view.tick.saturating_sub(s.hull.last_turn_tick) < AI_SHOT_HOLD_TICKS;
        (self.shot_hold > 0 && just_turned).then(|| {
            Action::new(
                Strategy::MaintainShot,
                format!("Maintaining shot direction ({})", self.shot_hold),
                DangerLevel::Low,
            )
            .driving()
        })
    }

    // ---- stage 2 -------------------------------------------------------

    fn close_combat(&mut self, s: &mut Steering) -> Option<Action> {
        let target = targeting::priority_enemy(s.view, &s.hull, self.shot_hold)?;
        self.diagnostics.target_enemy = Some(target.id);
        let me = s.position();
        let enemy = target.hull.position;
        if !targeting::is_next_to(target, me, IMMEDIATE_SHOOT_DISTANCE, CLOSE_COMBAT_DISTANCE) {
            return None;
        }

        // Lane check from the physical box: adjacent tanks only need to share
        // a row or column within a cell.
        let d = (s.hull.physical.as_dvec2() - enemy).abs();
        if d.x > 1.0 && d.y > 1.0 {
            return None;
        }
        if tankgrid_arena::obstacle_between(s.view.arena, s.hull.physical.as_dvec2(), enemy) {
            return None;
        }

        s.turn(dominant_direction(enemy - me));
        s.hull.align();
        if s.view.weapon_ready() && self.shot_hold == 0 {
            self.shoot(s, true);
            return Some(Action::new(Strategy::CloseCombat, "Close combat shot", DangerLevel::Critical).firing());
        }
        Some(Action::new(
            Strategy::CloseCombat,
            "Aiming at adjacent enemy",
            DangerLevel::Critical,
        ))
    }

    // ---- stage 3 -------------------------------------------------------

    fn bullet_safety(&mut self, s: &mut Steering) -> Option<Action> {
        let me = s.view.me;
        if me.invulnerable_timer > SAFE_WINDOW_TICKS && s.view.frozen_ticks > SAFE_WINDOW_TICKS {
            return None;
        }

        let collision = threat::current_move_collision(s.view, &s.hull, &s.scan);
        let shot = threat::bullet_to_destroy(s.view, &s.hull);
        let safest = threat::safest_direction(s.view, &s.hull);

        let safest_danger = safest.map_or(0.0, |h| h.danger);
        self.diagnostics.bullet_risk = if collision.is_some() {
            RiskLevel::High
        } else if safest_danger > MODERATE_DANGER {
            RiskLevel::Medium
        } else if safest_danger > LOW_DANGER {
            RiskLevel::Low
        } else {
            RiskLevel::None
        };
        self.diagnostics.time_to_collision = safest.map(|h| h.ttc).filter(|t| t.is_finite());

        if let Some(shot) = shot {
            if shot.ttc < DESTROY_TTC && s.view.weapon_ready() && self.shot_hold == 0 {
                s.turn(shot.direction);
                s.hull.align();
                self.shoot(s, true);
                let label = if shot.perpendicular {
                    "Destroying perpendicular bullet"
                } else {
                    "Destroying incoming bullet"
                };
                return Some(Action::new(Strategy::BulletDefense, label, DangerLevel::Critical).firing());
            }
        }

        if let (Some(collision), Some(safest)) = (collision, safest) {
            match collision.kind {
                CollisionKind::Perpendicular => {
                    self.diagnostics.perpendicular_risk = RiskLevel::High;
                    return Some(self.evade(s, safest, true));
                }
                CollisionKind::Direct if collision.ttc < AI_MIN_TTC => {
                    return Some(self.evade(s, safest, false));
                }
                CollisionKind::Direct => {}
            }
        }

        let safest = safest?;
        if safest.danger > MODERATE_DANGER && safest.heading != Some(s.hull.facing) {
            return Some(match safest.heading {
                None => Action::new(Strategy::SaferRoute, "Pausing for safety", DangerLevel::Medium),
                Some(heading) => {
                    s.turn(heading);
                    Action::new(Strategy::SaferRoute, "Taking safer route", DangerLevel::Medium).driving()
                }
            });
        }
        None
    }

    fn evade(&mut self, s: &mut Steering, safest: SafeHeading, perpendicular: bool) -> Action {
        let what = if perpendicular { "perpendicular bullet" } else { "bullet" };
        match safest.heading {
            None => Action::new(Strategy::Dodge, format!("Stopping for {what}"), DangerLevel::Critical),
            Some(heading) if heading != s.hull.facing => {
                s.turn(heading);
                let danger = if perpendicular { DangerLevel::Critical } else { DangerLevel::High };
                let mut action = Action::new(Strategy::Dodge, format!("Dodging {what}"), danger).driving();
                action.dodged = true;
                action
            }
            Some(_) => Action::new(Strategy::Dodge, format!("Evading {what}"), DangerLevel::High).driving(),
        }
    }

    // ---- stage 4 -------------------------------------------------------

    /// Does the power-up on the field deserve a detour right now?
    fn wants_power_up(&self, s: &Steering) -> Option<PowerUp> {
        let power_up = *s.view.power_up?;
        let me = s.view.me;
        let enclosed = s.view.arena.hard_overlap_count(power_up.cell.as_dvec2()) >= 4;
        let useless = match power_up.kind {
            PowerUpKind::Star => me.power_level >= STAR_POWER_CAP,
            PowerUpKind::Gun => me.power_level == MAX_POWER_LEVEL,
            PowerUpKind::ExtraLife => s.view.partner.is_some_and(|p| me.lives > p.lives),
            PowerUpKind::Bomb | PowerUpKind::Shovel | PowerUpKind::Helmet => {
                s.view.frozen_ticks > SAFE_WINDOW_TICKS
            }
            PowerUpKind::Clock => false,
        };
        let busy = targeting::close_to_any_enemy(s.view, s.position());
        (!enclosed && !useless && !busy).then_some(power_up)
    }

    fn clear_path(&mut self, s: &mut Steering) -> Option<Action> {
        let brick = self.brick.filter(|_| self.brick_blocked)?;
        if self.wants_power_up(s).is_some() {
            return None;
        }

        let me = s.position();
        let cell = brick.cell.as_dvec2();
        let distance = me.distance(cell);
        let shoot_direction = dominant_direction(cell - me);
        let d = (me - cell).abs();
        let in_line = (d.x <= 1.0 || d.y <= 1.0) && !steel_between(s.view.arena, me, cell);

        if !in_line {
            let steps = self.replan(s, brick.stand.as_dvec2());
            return Some(match steps.first() {
                Some(&step) => {
                    s.turn(step);
                    Action::new(
                        Strategy::ClearPath,
                        format!("Moving to brick, no line of sight ({distance:.1} cells)"),
                        DangerLevel::Low,
                    )
                    .driving()
                }
                None => {
                    self.brick_blocked = false;
                    self.brick = None;
                    Action::new(Strategy::ClearPath, "Cannot reach brick", DangerLevel::Low)
                }
            });
        }

        if distance > BRICK_SHOT_RANGE {
            let steps = self.replan(s, cell);
            s.turn(steps.first().copied().unwrap_or(shoot_direction));
            return Some(
                Action::new(
                    Strategy::ClearPath,
                    format!("Moving closer to brick ({distance:.1} cells)"),
                    DangerLevel::Low,
                )
                .driving(),
            );
        }

        s.turn(shoot_direction);
        s.hull.align();
        if s.view.weapon_ready() {
            self.shoot(s, false);
            return Some(
                Action::new(
                    Strategy::ClearPath,
                    format!("Shooting brick ({distance:.1} cells)"),
                    DangerLevel::Low,
                )
                .firing(),
            );
        }
        Some(Action::new(
            Strategy::ClearPath,
            format!("Waiting to shoot brick ({distance:.1} cells)"),
            DangerLevel::Low,
        ))
    }

    // ---- stage 5 -------------------------------------------------------

    fn seek_power_up(&mut self, s: &mut Steering) -> Option<Action> {
        let power_up = self.wants_power_up(s)?;
        if s.hull.visual_box().overlaps(&power_up.rect()) {
            // Already touching it; pickup happens this tick.
            return None;
        }
        // A brick still blocks the old route: keep shooting while detouring.
        let shoot_anyway = self.brick_blocked && self.brick.is_some() && s.view.weapon_ready();

        let target = power_up.cell.as_dvec2();
        let mut action = None;
        if s.position().distance(target) <= SIMPLE_APPROACH_RANGE || self.simple_approach > 0 {
            if self.simple_approach == 0 {
                self.simple_approach = AI_SIMPLE_APPROACH_TICKS;
            }
            action = self.approach_directly(s, &power_up);
        }
        let mut action = match action {
            Some(action) => action,
            None => self.path_to_power_up(s, &power_up),
        };
        if shoot_anyway && !action.fire {
            self.shoot(s, false);
            action.fire = true;
        }
        Some(action)
    }

    /// Short-range approach without pathfinding. `None` hands over to the
    /// path planner.
    fn approach_directly(&mut self, s: &mut Steering, power_up: &PowerUp) -> Option<Action> {
        let arena = s.view.arena;
        let me = s.position();
        let facing = s.hull.facing;

        if brick_ahead(arena, me, facing) {
            if s.view.weapon_ready() {
                self.shoot(s, true);
                return Some(Action::new(Strategy::SeekPowerUp, "Shooting blocking brick", DangerLevel::Low).firing());
            }
            return Some(Action::new(Strategy::SeekPowerUp, "Waiting to shoot brick", DangerLevel::Low));
        }

        let goal = power_up.rect();
        let mut heading = facing;
        let mut reachable = false;
        for direction in Direction::ALL {
            if probe_reaches(arena, s.hull.physical, direction, &goal) {
                heading = direction;
                reachable = true;
            }
        }

        let close = goal.min - me;
        if !reachable && self.seek_turn == 0 {
            let mut horizontal_ok = true;
            if close.x.abs() > 0.5 {
                heading = if close.x > 0.0 { Direction::Right } else { Direction::Left };
                horizontal_ok = arena.hard_overlap_count(me + heading.unit() * 0.1) == 0;
            }
            let mut vertical_ok = false;
            if close.y.abs() > 0.5 {
                let vertical = if close.y > 0.0 { Direction::Down } else { Direction::Up };
                if !horizontal_ok {
                    heading = vertical;
                }
                vertical_ok = arena.hard_overlap_count(me + vertical.unit() * 0.1) == 0;
            }
            if !(horizontal_ok && vertical_ok) && (close.x == 0.0 || close.y == 0.0) {
                self.simple_approach = 0;
            }
            if heading != facing {
                self.seek_turn = AI_SIMPLE_APPROACH_TICKS;
            }
        }

        if heading != facing && brick_ahead(arena, me, heading) {
            s.turn(heading);
            if s.view.weapon_ready() {
                self.shoot(s, true);
                return Some(Action::new(Strategy::SeekPowerUp, "Shooting brick on new heading", DangerLevel::Low).firing());
            }
            return Some(Action::new(Strategy::SeekPowerUp, "Facing brick, waiting to shoot", DangerLevel::Low));
        }

        s.turn(heading);
        let rounded = me.round();
        let mut action = Action::new(
            Strategy::SeekPowerUp,
            format!("Direct approach {heading:?}"),
            DangerLevel::Low,
        )
        .driving();
        if rounded == goal.min {
            action.label = "Ready for pickup".into();
            action.drive = false;
        } else if (rounded - goal.min).abs().max_element() <= 1.0 {
            action.label = "In position for pickup".into();
        }

        (self.simple_approach > 0).then_some(action)
    }

    fn path_to_power_up(&mut self, s: &mut Steering, power_up: &PowerUp) -> Action {
        // Both footprints are 2x2, so the tank anchor goes on the power-up anchor.
        let target = power_up.cell.as_dvec2() + DVec2::splat((POWER_UP_SIZE - TANK_SIZE) / 2.0);
        self.path = self.replan(s, target);
        self.path_anchor = s.hull.physical;

        let mut action = match self.path.first().copied() {
            Some(step) => {
                if step != s.hull.facing && !s.hull.needs_alignment {
                    s.turn(step);
                    self.move_commit = AI_MOVE_COMMIT_TICKS;
                }
                Action::new(Strategy::SeekPowerUp, "Pathing to power-up", DangerLevel::Low).driving()
            }
            None => {
                s.turn(dominant_direction(target - s.position()));
                Action::new(Strategy::SeekPowerUp, "Direct move to power-up", DangerLevel::Low).driving()
            }
        };
        if s.hull.visual_box().overlaps(&power_up.rect()) {
            action.label = "Reached power-up".into();
            action.drive = false;
        }
        action
    }

    // ---- stage 6 -------------------------------------------------------

    fn engage(&mut self, s: &mut Steering) -> Option<Action> {
        let action = if self.shot_hold > 0 {
            Action::new(
                Strategy::HoldCourse,
                format!("Holding course ({})", self.shot_hold),
                DangerLevel::Low,
            )
            .driving()
        } else {
            self.combat(s)
        };
        s.hull.align();
        Some(action)
    }

    fn combat(&mut self, s: &mut Steering) -> Action {
        let Some(target) = targeting::priority_enemy(s.view, &s.hull, self.shot_hold) else {
            return self.explore(s);
        };
        self.diagnostics.target_enemy = Some(target.id);
        let me = s.position();
        let enemy = target.hull.position;
        let distance = me.distance(enemy);

        if let Some(lead) = prediction::evaluate(s.view.arena, target, me, s.view.tick) {
            self.diagnostics.prediction = lead.view();
            if lead.is_viable() {
                s.turn(lead.direction);
                s.hull.align();
                if s.view.weapon_ready() && !targeting::shot_hits_base(s.view.arena, s.position(), lead.direction) {
                    self.shoot(s, true);
                    return Action::new(Strategy::PredictiveShot, "Predictive shot", DangerLevel::Medium).firing();
                }
                return Action::new(Strategy::PredictiveShot, "Aiming for predictive shot", DangerLevel::Low).driving();
            }
        }

        let facing_me = targeting::enemy_facing(target, me);
        if facing_me && targeting::has_line_of_sight(s.view.arena, &s.hull, enemy) {
            return self.duel(s, enemy);
        }
        self.chase(s, enemy, distance)
    }

    /// The target faces us in the open: line up on its axis, then fire.
    fn duel(&mut self, s: &mut Steering, enemy: DVec2) -> Action {
        let me = s.position();
        if !targeting::is_aligned(me, enemy) {
            s.turn(targeting::alignment_direction(me, enemy));
            return Action::new(Strategy::AlignBeforeAttack, "Aligning to enemy", DangerLevel::Medium).driving();
        }

        if let Some(direction) = targeting::aligned_shot_direction(me, enemy) {
            s.turn(direction);
        }
        if !targeting::can_shoot_from_here(s.view, &s.hull, enemy, self.shot_hold) {
            return Action::new(Strategy::AlignBeforeAttack, "Positioning (aligned)", DangerLevel::High).driving();
        }
        s.hull.align();
        if targeting::shot_hits_base(s.view.arena, s.position(), s.hull.facing) {
            return Action::new(Strategy::AlignBeforeAttack, "Holding fire, base in line", DangerLevel::High).driving();
        }
        self.shoot(s, true);
        Action::new(Strategy::AlignBeforeAttack, "Shooting at enemy (aligned)", DangerLevel::High).firing()
    }

    fn chase(&mut self, s: &mut Steering, enemy: DVec2, distance: f64) -> Action {
        let view = s.view;
        let mut fire = false;
        if targeting::can_shoot_from_here(view, &s.hull, enemy, self.shot_hold)
            && !targeting::shot_hits_base(view.arena, s.position(), s.hull.facing)
        {
            self.shoot(s, true);
            fire = true;
        } else if self
            .last_path_tick
            .map_or(true, |t| view.tick.saturating_sub(t) > AI_UPDATE_INTERVAL * 2)
        {
            self.path = self.replan(s, enemy);
            self.path_anchor = s.hull.physical;
            self.last_path_tick = Some(view.tick);
            self.move_commit = 0;
        }

        let danger = if distance < AI_AVOID_DISTANCE {
            DangerLevel::Medium
        } else {
            DangerLevel::Low
        };
        let mut action = if self.move_commit > 0 {
            Action::new(Strategy::Chase, "Moving (committed)", danger).driving()
        } else if let Some(step) = self.path.first().copied() {
            if step != s.hull.facing && !s.hull.needs_alignment {
                s.turn(step);
                self.move_commit = AI_MOVE_COMMIT_TICKS;
            }
            self.advance_path(s.hull.physical);
            Action::new(Strategy::Chase, "Moving to enemy", danger).driving()
        } else {
            // No route inside the search budget: head straight for it.
            s.turn(dominant_direction(enemy - s.position()));
            Action::new(Strategy::Chase, "Direct move to enemy", danger).driving()
        };
        if fire {
            action.fire = true;
            action.label = "Shooting enemy in line".into();
        }
        action
    }

    /// Pop the head step once the physical box has reached its end cell.
    fn advance_path(&mut self, physical: IVec2) {
        if let Some(step) = self.path.first() {
            let end = self.path_anchor + step.step();
            if physical == end {
                self.path.remove(0);
                self.path_anchor = end;
            }
        }
    }

    fn explore(&mut self, s: &mut Steering) -> Action {
        if s.view.tick % AI_EXPLORE_TURN_TICKS == 0 && !s.hull.needs_alignment {
            let next = s.hull.facing.clockwise();
            s.turn(next);
        }
        Action::new(Strategy::Exploring, "Exploring", DangerLevel::Low).driving()
    }
}

/// Is there a live brick one cell ahead of a tank at `position`?
fn brick_ahead(arena: &Arena, position: DVec2, direction: Direction) -> bool {
    let probe = clamp_tank_position(position + direction.unit());
    Arena::cells_overlapping(&Rect::tank(probe))
        .any(|cell| matches!(arena.tile(cell), Tile::Brick(q) if q.is_alive()))
}

/// Probe up to two cells from `anchor` toward `direction`: does the tank
/// footprint touch `goal` before hitting steel or river?
fn probe_reaches(arena: &Arena, anchor: IVec2, direction: Direction, goal: &Rect) -> bool {
    let mut probe = anchor;
    for _ in 1..3 {
        probe += direction.step();
        let position = probe.as_dvec2();
        if position.x > TANK_MAX_COORD || position.y > TANK_MAX_COORD || arena.hard_overlap_count(position) > 0 {
            return false;
        }
        if Rect::tank(position).overlaps(goal) {
            return true;
        }
    }
    false
}
