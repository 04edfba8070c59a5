//! Coverage engine: decides which subscribers own at least one magazine in every category.
//!
//! The engine is read-only over its inputs. Subscribers are tested independently across the
//! rayon pool; each worker accumulates qualifying ids into a local buffer and the buffers are
//! merged once every subscriber has been evaluated, so no shared collection is ever written
//! concurrently.

// crates.io
use rayon::prelude::*;
// self
use crate::{
	_prelude::*,
	model::{Category, CategorySet, CoverageResult, Magazine, MagazineId, Subscriber, SubscriberId},
};

/// Category → magazine-id mapping the coverage test runs against.
///
/// The judged categories are exactly the fetched set: a category without magazines keeps an
/// empty entry (nobody can cover it), and magazines tagged with a category outside the set
/// are ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MagazineIndex(HashMap<Category, HashSet<MagazineId>>);
impl MagazineIndex {
	/// Groups `magazines` by category, seeded with every entry of `categories`.
	pub fn build(categories: &CategorySet, magazines: &[Magazine]) -> Self {
		let mut index = categories
			.iter()
			.map(|category| (category.clone(), HashSet::new()))
			.collect::<HashMap<_, _>>();

		for magazine in magazines {
			if let Some(ids) = index.get_mut(&magazine.category) {
				ids.insert(magazine.id);
			}
		}

		Self(index)
	}

	/// Number of judged categories.
	pub fn category_count(&self) -> usize {
		self.0.len()
	}

	/// Magazine ids indexed under `category`, if it is judged.
	pub fn magazines_of(&self, category: &str) -> Option<&HashSet<MagazineId>> {
		self.0.get(category)
	}

	/// Whether `subscriber` owns at least one magazine of every judged category.
	///
	/// Vacuously true when no categories are judged.
	pub fn covers(&self, subscriber: &Subscriber) -> bool {
		self.0.values().all(|ids| !ids.is_disjoint(&subscriber.magazine_ids))
	}

	/// Evaluates every subscriber concurrently and returns the qualifying ids.
	pub fn covered_subscribers(&self, subscribers: &[Subscriber]) -> CoverageResult {
		subscribers
			.par_iter()
			.fold(Vec::new, |mut local: Vec<SubscriberId>, subscriber| {
				if self.covers(subscriber) {
					local.push(subscriber.id);
				}

				local
			})
			.reduce(Vec::new, |mut merged, mut local| {
				merged.append(&mut local);

				merged
			})
			.into_iter()
			.collect()
	}
}

/// Returns the subscribers that own at least one magazine in every category of `categories`.
pub fn evaluate(
	subscribers: &[Subscriber],
	magazines: &[Magazine],
	categories: &CategorySet,
) -> CoverageResult {
	MagazineIndex::build(categories, magazines).covered_subscribers(subscribers)
}
