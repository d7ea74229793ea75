//! One-shot blast resolution: terrain carving and falloff damage.

use artillery_duel_core::{Event, Team, WorldPoint};
use log::debug;

use crate::{
    combatant::{blast_damage, Rosters},
    config::BlastConfig,
    terrain::Terrain,
};

#[derive(Clone, Copy, Debug)]
pub(crate) struct Blast {
    center: WorldPoint,
    radius: f32,
    max_damage: u32,
}

impl Blast {
    pub(crate) const fn new(center: WorldPoint, config: &BlastConfig) -> Self {
        Self {
            center,
            radius: config.radius,
            max_damage: config.max_damage,
        }
    }

    /// Carves the crater and damages every living combatant in range.
    ///
    /// Both mutations complete before this returns. Team totals that changed
    /// are reported after the per-combatant events.
    pub(crate) fn detonate(self, terrain: &mut Terrain, rosters: &mut Rosters, out: &mut Vec<Event>) {
        let totals_before = Team::ALL.map(|team| rosters.total_health(team));

        let cleared_cells = terrain.carve(self.center.x(), self.center.y(), self.radius);
        out.push(Event::Exploded {
            center: self.center,
            radius: self.radius,
            cleared_cells,
        });

        for combatant in rosters.iter_mut() {
            if !combatant.is_alive() {
                continue;
            }
            let distance = self.center.distance(combatant.position());
            let amount = blast_damage(distance, self.radius, self.max_damage);
            if amount == 0 {
                continue;
            }

            let killed = combatant.apply_damage(amount);
            debug!(
                "combatant {} took {amount} damage at distance {distance:.1}",
                combatant.id().get()
            );
            out.push(Event::CombatantDamaged {
                combatant: combatant.id(),
                amount,
                health: combatant.health(),
            });
            if killed {
                out.push(Event::CombatantKilled {
                    combatant: combatant.id(),
                });
            }
        }

        for (team, before) in Team::ALL.into_iter().zip(totals_before) {
            let total = rosters.total_health(team);
            if total != before {
                out.push(Event::TeamHealthChanged { team, total });
            }
        }
    }
}
