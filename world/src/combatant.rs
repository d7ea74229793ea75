//! Team members and their rosters.

use artillery_duel_core::{CombatantId, Health, Team, WorldPoint};

use crate::{config::MatchConfig, terrain::Terrain};

/// Damage dealt by a blast of `radius` to a target `distance` away from its centre.
///
/// Falls off linearly from `max_damage` at the epicentre to zero at the rim;
/// targets beyond the rim take nothing.
#[must_use]
pub fn blast_damage(distance: f32, radius: f32, max_damage: u32) -> u32 {
    if !(radius > 0.0) || !(distance >= 0.0) || distance > radius {
        return 0;
    }
    let damage = ((1.0 - distance / radius) * max_damage as f32).floor();
    damage.clamp(0.0, max_damage as f32) as u32
}

#[derive(Clone, Debug)]
pub(crate) struct Combatant {
    id: CombatantId,
    team: Team,
    x: f32,
    y: f32,
    radius: f32,
    health: Health,
    alive: bool,
}

impl Combatant {
    pub(crate) fn new(id: CombatantId, team: Team, x: f32, radius: f32) -> Self {
        Self {
            id,
            team,
            x,
            y: 0.0,
            radius,
            health: Health::MAX,
            alive: true,
        }
    }

    pub(crate) const fn id(&self) -> CombatantId {
        self.id
    }

    pub(crate) const fn team(&self) -> Team {
        self.team
    }

    pub(crate) const fn health(&self) -> Health {
        self.health
    }

    pub(crate) const fn is_alive(&self) -> bool {
        self.alive
    }

    pub(crate) const fn radius(&self) -> f32 {
        self.radius
    }

    pub(crate) const fn position(&self) -> WorldPoint {
        WorldPoint::new(self.x, self.y)
    }

    /// Snaps the combatant onto the topmost solid cell of its column.
    pub(crate) fn rest_on_terrain(&mut self, terrain: &Terrain) {
        let surface = terrain.surface_y(self.x.floor() as i64);
        self.y = surface as f32 - self.radius;
    }

    /// Removes health and reports whether this blow killed the combatant.
    pub(crate) fn apply_damage(&mut self, amount: u32) -> bool {
        if !self.alive {
            return false;
        }
        self.health = self.health.saturating_sub(amount);
        if self.health.is_zero() {
            self.alive = false;
            return true;
        }
        false
    }
}

/// Both teams' combatants, each exclusively owned by its roster.
#[derive(Clone, Debug, Default)]
pub(crate) struct Rosters {
    red: Vec<Combatant>,
    blue: Vec<Combatant>,
}

impl Rosters {
    /// Places both teams according to the configured layout.
    pub(crate) fn deploy(config: &MatchConfig) -> Self {
        let width = config.width as f32;
        let radius = config.combatant_radius;
        let mut next_id = 0_u32;
        let mut allocate = |team: Team, x: f32| {
            let combatant = Combatant::new(CombatantId::new(next_id), team, x, radius);
            next_id = next_id.wrapping_add(1);
            combatant
        };

        let red = config
            .roster
            .red
            .iter()
            .map(|offset| allocate(Team::Red, *offset))
            .collect();
        let blue = config
            .roster
            .blue
            .iter()
            .map(|offset| allocate(Team::Blue, width - *offset))
            .collect();

        Self { red, blue }
    }

    pub(crate) fn team(&self, team: Team) -> &[Combatant] {
        match team {
            Team::Red => &self.red,
            Team::Blue => &self.blue,
        }
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Combatant> {
        self.red.iter().chain(self.blue.iter())
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Combatant> {
        self.red.iter_mut().chain(self.blue.iter_mut())
    }

    /// First living member of the team in roster order.
    pub(crate) fn first_living(&self, team: Team) -> Option<&Combatant> {
        self.team(team).iter().find(|combatant| combatant.is_alive())
    }

    /// Sum of the health of every living member of the team.
    pub(crate) fn total_health(&self, team: Team) -> u32 {
        self.team(team)
            .iter()
            .filter(|combatant| combatant.is_alive())
            .map(|combatant| combatant.health().get())
            .sum()
    }

    pub(crate) fn rest_on(&mut self, terrain: &Terrain) {
        for combatant in self.iter_mut() {
            combatant.rest_on_terrain(terrain);
        }
    }
}
