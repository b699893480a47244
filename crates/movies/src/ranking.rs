use core::cmp::Ordering;

use crate::Movie;

/// Order movies best-rated first and number them from 1.
///
/// Unrated movies sort after every rated one; ties keep id order so the
/// result is deterministic.
pub fn assign_rankings(movies: &mut [Movie]) {
    movies.sort_by(|a, b| compare_ratings(a.rating, b.rating).then_with(|| a.id.cmp(&b.id)));
    for (position, movie) in movies.iter_mut().enumerate() {
        movie.ranking = Some(position as i64 + 1);
    }
}

fn compare_ratings(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
