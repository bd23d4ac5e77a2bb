//! Aggregate statistics over the loaded character collection.

use crate::model::Character;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CharacterStats {
    pub total: usize,
    pub alive: usize,
    pub deceased: usize,
    pub male: usize,
    pub female: usize,
    /// Mean over characters whose age parses; `None` when none do.
    pub average_age: Option<f64>,
}

pub fn character_stats(characters: &[Character]) -> CharacterStats {
    let mut stats = CharacterStats {
        total: characters.len(),
        ..CharacterStats::default()
    };
    let mut age_sum = 0i64;
    let mut age_count = 0usize;
    for character in characters {
        match character.status.as_deref() {
            Some("Alive") => stats.alive += 1,
            Some("Deceased") => stats.deceased += 1,
            _ => {}
        }
        match character.gender.as_deref() {
            Some("Male") => stats.male += 1,
            Some("Female") => stats.female += 1,
            _ => {}
        }
        if let Some(age) = character
            .age
            .as_deref()
            .and_then(|raw| raw.trim().parse::<i64>().ok())
        {
            age_sum += age;
            age_count += 1;
        }
    }
    if age_count > 0 {
        stats.average_age = Some(age_sum as f64 / age_count as f64);
    }
    stats
}
