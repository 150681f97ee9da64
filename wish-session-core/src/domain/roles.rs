use crate::domain::Player;
use rand::seq::SliceRandom;
use rand::Rng;

/// Assign every player in the roster another player as master.
///
/// The roster order is shuffled, then each player's master is its
/// successor in the shuffled cycle. A single cycle over two or more
/// players has no fixed point, so no player is ever its own master.
///
/// No-op below two players; the caller guarantees the precondition.
pub fn assign_roles<R: Rng + ?Sized>(roster: &mut [Player], rng: &mut R) {
    if roster.len() < 2 {
        return;
    }

    let mut order: Vec<usize> = (0..roster.len()).collect();
    order.shuffle(rng);

    for k in 0..order.len() {
        let angel = order[k];
        let master = order[(k + 1) % order.len()];

        let master_id = roster[master].id();
        let master_name = roster[master].nickname().to_owned();
        roster[angel].assign_master(master_id, master_name);
    }
}
