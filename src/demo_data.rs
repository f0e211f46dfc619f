use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::shots::{GOAL_OUTCOME, PENALTY_SHOT_TYPE, PITCH_LENGTH, PITCH_WIDTH, RawShotRecord};

const PENALTY_SPOT: (f64, f64) = (108.0, 40.0);
const PENALTY_XG: f64 = 0.7835;
const MISS_OUTCOMES: &[&str] = &["Saved", "Off T", "Blocked", "Wayward", "Post"];

fn seed_squads() -> Vec<(&'static str, Vec<&'static str>)> {
    vec![
        (
            "Spain",
            vec!["Lamine Yamal", "Nico Williams", "Álvaro Morata", "Dani Olmo", "Fabián Ruiz"],
        ),
        (
            "England",
            vec!["Harry Kane", "Jude Bellingham", "Bukayo Saka", "Phil Foden", "Cole Palmer"],
        ),
        ("Germany", vec!["Jamal Musiala", "Kai Havertz", "Florian Wirtz", "Niclas Füllkrug"]),
        (
            "France",
            vec!["Kylian Mbappé", "Antoine Griezmann", "Ousmane Dembélé", "Randal Kolo Muani"],
        ),
        ("Netherlands", vec!["Cody Gakpo", "Xavi Simons", "Memphis Depay", "Donyell Malen"]),
        (
            "Portugal",
            vec!["Cristiano Ronaldo", "Bruno Fernandes", "Bernardo Silva", "Rafael Leão"],
        ),
    ]
}

/// Seeded synthetic tournament in the raw file shape, locations encoded as
/// JSON text so the normal load path is exercised.
pub fn generate_raw_shots(seed: u64, shots_per_team: usize) -> Vec<RawShotRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut out = Vec::with_capacity(shots_per_team * 6);

    for (team, players) in seed_squads() {
        for _ in 0..shots_per_team {
            let Some(player) = players.choose(&mut rng) else {
                continue;
            };
            out.push(random_shot(&mut rng, team, player));
        }
    }
    out
}

fn random_shot(rng: &mut StdRng, team: &str, player: &str) -> RawShotRecord {
    let roll: f64 = rng.gen_range(0.0..1.0);
    let (shot_type, x, y, xg) = if roll < 0.03 {
        (PENALTY_SHOT_TYPE, PENALTY_SPOT.0, PENALTY_SPOT.1, PENALTY_XG)
    } else {
        let x = rng.gen_range(82.0..119.0);
        let y = rng.gen_range(14.0..66.0);
        let kind = if roll < 0.08 { "Free Kick" } else { "Open Play" };
        (kind, x, y, xg_for(x, y))
    };

    let outcome = if rng.gen_bool(xg) {
        GOAL_OUTCOME
    } else {
        MISS_OUTCOMES.choose(rng).copied().unwrap_or("Saved")
    };

    RawShotRecord {
        team: team.to_string(),
        player: player.to_string(),
        location: format!("[{x:.1}, {y:.1}]"),
        shot_type: shot_type.to_string(),
        shot_outcome: outcome.to_string(),
        expected_goals: xg,
    }
}

// Decays with distance to the goal mouth; a stand-in, not a fitted model.
fn xg_for(x: f64, y: f64) -> f64 {
    let dx = PITCH_LENGTH - x;
    let dy = (PITCH_WIDTH / 2.0 - y).abs();
    let dist = (dx * dx + dy * dy).sqrt();
    (0.65 * (-dist / 9.0).exp()).clamp(0.01, 0.95)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_rows() {
        assert_eq!(generate_raw_shots(7, 20), generate_raw_shots(7, 20));
        assert_ne!(generate_raw_shots(7, 20), generate_raw_shots(8, 20));
    }

    #[test]
    fn xg_stays_in_unit_range() {
        for raw in generate_raw_shots(11, 50) {
            assert!((0.0..=1.0).contains(&raw.expected_goals));
        }
    }
}
