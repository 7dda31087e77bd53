//! Orthographic gender heuristics for Portuguese given names.

use crate::family::Gender;

/// Whether `name` belongs in the feminine half of a decade's name pool:
/// it ends in `a` or is a listed exception.
pub fn is_feminine_pool_name(name: &str, feminine_exceptions: &[String]) -> bool {
    name.ends_with('a') || feminine_exceptions.iter().any(|e| e == name)
}

/// Whether `name` belongs in the masculine half of a decade's name pool:
/// it does not end in `a`, or is a listed exception.
pub fn is_masculine_pool_name(name: &str, masculine_exceptions: &[String]) -> bool {
    !name.ends_with('a') || masculine_exceptions.iter().any(|e| e == name)
}

/// Guess a gender from a given name alone.
///
/// Names ending in `a` read as feminine, except `-ca` and `-ra` endings.
pub fn infer_gender_from_given_name(given_name: &str) -> Gender {
    let lower = given_name.to_lowercase();
    if lower.ends_with('a') && !lower.ends_with("ca") && !lower.ends_with("ra") {
        Gender::Female
    } else {
        Gender::Male
    }
}
