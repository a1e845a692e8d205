use crate::model::Grade;

/// Weighted course percentage over one course's grade entries.
///
/// Each entry contributes its own percentage (`score / max_score * 100`)
/// scaled by its weight, normalized by the total weight actually
/// recorded, NOT by an assumed 100. A course with only 60 weight points
/// entered still averages over those 60, it is not penalized for the
/// missing 40. Zero-weight entries drop out of both sums.
///
/// `max_score == 0` would make a term non-finite; entry validation keeps
/// such grades out before they reach storage, so this function does not
/// re-guard per term.
pub fn calculate_course_grade(grades: &[Grade]) -> f64 {
    if grades.is_empty() {
        return 0.0;
    }
    let mut weighted_sum = 0.0_f64;
    let mut total_weight = 0.0_f64;
    for g in grades {
        weighted_sum += (g.score / g.max_score) * 100.0 * g.weight;
        total_weight += g.weight;
    }
    if total_weight > 0.0 {
        weighted_sum / total_weight
    } else {
        0.0
    }
}

/// Display letter for a percentage. Total over all input: anything at or
/// above 97 is the A+ band (values over 100 included), anything below 60
/// is F (negative values included).
pub fn letter_grade(percent: f64) -> &'static str {
    if percent >= 97.0 {
        "A+"
    } else if percent >= 93.0 {
        "A"
    } else if percent >= 90.0 {
        "A-"
    } else if percent >= 87.0 {
        "B+"
    } else if percent >= 83.0 {
        "B"
    } else if percent >= 80.0 {
        "B-"
    } else if percent >= 77.0 {
        "C+"
    } else if percent >= 73.0 {
        "C"
    } else if percent >= 70.0 {
        "C-"
    } else if percent >= 67.0 {
        "D+"
    } else if percent >= 65.0 {
        "D"
    } else if percent >= 60.0 {
        "D-"
    } else {
        "F"
    }
}
