use crate::route::review::model::Review;

/// Computes the mean rating of a set of reviews.
///
/// Returns 0 when there are no reviews. The result is not rounded.
pub fn recompute_average<'a, I>(reviews: I) -> f64
where
	I: IntoIterator<Item = &'a Review>,
{
	let (total, count) = reviews
		.into_iter()
		.fold((0i64, 0u32), |(total, count), review| {
			(total + i64::from(review.rating), count + 1)
		});

	if count == 0 {
		return 0.0;
	}

	total as f64 / f64::from(count)
}

#[cfg(test)]
mod test {
	use uuid::Uuid;

	use super::*;
	use crate::model::Author;

	fn reviews(ratings: &[i16]) -> Vec<Review> {
		let campground_id = Uuid::new_v4();

		ratings
			.iter()
			.map(|&rating| Review {
				id: Uuid::new_v4(),
				campground_id,
				rating,
				text: String::new(),
				author: Author::default(),
				created_at: chrono::Utc::now(),
				updated_at: chrono::Utc::now(),
			})
			.collect()
	}

	#[test]
	fn test_empty_is_zero() {
		assert_eq!(recompute_average(&reviews(&[])), 0.0);
	}

	#[test]
	fn test_mean_of_ratings() {
		assert_eq!(recompute_average(&reviews(&[4, 5, 3])), 4.0);
		assert_eq!(recompute_average(&reviews(&[5])), 5.0);
	}

	#[test]
	fn test_not_rounded() {
		let average = recompute_average(&reviews(&[1, 2]));
		assert!((average - 1.5).abs() < 1e-9);

		let average = recompute_average(&reviews(&[5, 4, 4]));
		assert!((average - 13.0 / 3.0).abs() < 1e-9);
	}

	#[test]
	fn test_every_rating_triple() {
		for a in 1..=5 {
			for b in 1..=5 {
				for c in 1..=5 {
					let expected = f64::from(a + b + c) / 3.0;
					let average = recompute_average(&reviews(&[a, b, c]));

					assert!((average - expected).abs() < 1e-9, "{a} {b} {c}");
				}
			}
		}
	}
}
