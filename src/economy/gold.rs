use bevy::prelude::*;
use crate::shared::*;

/// Running totals for the current save.
#[derive(Resource, Debug, Clone, Default)]
pub struct EconomyStats {
    pub total_gold_earned: u64,
    pub total_gold_spent: u64,
    pub total_fish_sold: u64,
    pub total_transactions: u64,
}

/// Applies GoldChangeEvents to PlayerEconomy.gold through the economy port.
/// Spending more than the balance clamps to 0.
pub fn apply_gold_changes(
    mut gold_events: EventReader<GoldChangeEvent>,
    mut economy: ResMut<PlayerEconomy>,
    mut stats: ResMut<EconomyStats>,
) {
    for ev in gold_events.read() {
        let before = economy.current_gold();
        economy.add_gold(ev.amount as i64);
        let after = economy.current_gold();

        if ev.amount >= 0 {
            let gain = (after - before) as u64;
            stats.total_gold_earned = stats.total_gold_earned.saturating_add(gain);
            info!(
                "[Economy] Gold +{}: {}. New balance: {}g",
                gain, ev.reason, after
            );
        } else {
            let cost = (before - after) as u64;
            if cost < ev.amount.unsigned_abs() as u64 {
                warn!(
                    "[Economy] Tried to spend {}g but only had {}g (reason: {}). Clamped to 0.",
                    ev.amount.unsigned_abs(),
                    before,
                    ev.reason
                );
            }
            stats.total_gold_spent = stats.total_gold_spent.saturating_add(cost);
            info!(
                "[Economy] Gold -{}: {}. New balance: {}g",
                cost, ev.reason, after
            );
        }
        stats.total_transactions += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overspend_clamps_and_counts_what_was_paid() {
        let mut app = App::new();
        app.add_event::<GoldChangeEvent>()
            .insert_resource(PlayerEconomy { gold: 30 })
            .init_resource::<EconomyStats>()
            .add_systems(Update, apply_gold_changes);

        app.world_mut().send_event(GoldChangeEvent {
            amount: 20,
            reason: "sold fish".into(),
        });
        app.world_mut().send_event(GoldChangeEvent {
            amount: -100,
            reason: "repairs".into(),
        });
        app.update();

        assert_eq!(app.world().resource::<PlayerEconomy>().gold, 0);
        let stats = app.world().resource::<EconomyStats>();
        assert_eq!(stats.total_gold_earned, 20);
        assert_eq!(stats.total_gold_spent, 50);
        assert_eq!(stats.total_transactions, 2);
    }
}
