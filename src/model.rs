//! Domain values decoded from the magazine store.
//!
//! Every value is created once per run from fetched data and never mutated afterwards.

// std
use std::{borrow::Borrow, collections::btree_set, ops::Deref};
// self
use crate::_prelude::*;

/// Integer identifier of a magazine.
pub type MagazineId = i64;

/// UUID identifier of a subscriber.
pub type SubscriberId = Uuid;

/// Error returned when a session token cannot be used to scope requests.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum TokenError {
	/// The token was missing or empty.
	#[error("Session token cannot be empty.")]
	Empty,
}

/// Opaque session token scoping every data-bearing call; redacted in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);
impl SessionToken {
	/// Wraps a token string; any non-empty value is accepted as-is.
	pub fn new(value: impl Into<String>) -> Result<Self, TokenError> {
		let value = value.into();

		if value.is_empty() {
			return Err(TokenError::Empty);
		}

		Ok(Self(value))
	}

	/// Returns the raw token value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl Debug for SessionToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("SessionToken").field(&"<redacted>").finish()
	}
}
impl Display for SessionToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Named grouping of magazines.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(String);
impl Category {
	/// Wraps a category name.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}
}
impl Deref for Category {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl AsRef<str> for Category {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl Borrow<str> for Category {
	fn borrow(&self) -> &str {
		&self.0
	}
}
impl Debug for Category {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "Category({})", self.0)
	}
}
impl Display for Category {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}
impl From<&str> for Category {
	fn from(value: &str) -> Self {
		Self::new(value)
	}
}

/// Immutable, de-duplicated set of categories fetched for a run.
///
/// Iteration is ordered so fan-out and logs are deterministic.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CategorySet(BTreeSet<Category>);
impl CategorySet {
	/// Number of distinct categories.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Whether no categories were offered.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Whether `category` belongs to the set.
	pub fn contains(&self, category: &str) -> bool {
		self.0.contains(category)
	}

	/// Iterates categories in ascending order.
	pub fn iter(&self) -> btree_set::Iter<'_, Category> {
		self.0.iter()
	}
}
impl<C> FromIterator<C> for CategorySet
where
	C: Into<Category>,
{
	fn from_iter<I>(iter: I) -> Self
	where
		I: IntoIterator<Item = C>,
	{
		Self(iter.into_iter().map(Into::into).collect())
	}
}
impl<'a> IntoIterator for &'a CategorySet {
	type IntoIter = btree_set::Iter<'a, Category>;
	type Item = &'a Category;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

/// Magazine offered by the store; belongs to exactly one category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Magazine {
	/// Magazine identifier.
	pub id: MagazineId,
	/// Display name.
	#[serde(default)]
	pub name: String,
	/// Owning category.
	pub category: Category,
}

/// Subscriber record with the magazines they own.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscriber {
	/// Subscriber identifier.
	pub id: SubscriberId,
	/// Given name.
	#[serde(default)]
	pub first_name: String,
	/// Family name.
	#[serde(default)]
	pub last_name: String,
	/// Owned magazine identifiers; may be empty or reference unknown magazines.
	#[serde(default)]
	pub magazine_ids: HashSet<MagazineId>,
}

/// Unordered set of subscribers that cover every category.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CoverageResult(HashSet<SubscriberId>);
impl CoverageResult {
	/// Number of qualifying subscribers.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Whether no subscriber qualified.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Whether `id` qualified.
	pub fn contains(&self, id: &SubscriberId) -> bool {
		self.0.contains(id)
	}

	/// Iterates qualifying ids in arbitrary order.
	pub fn iter(&self) -> impl Iterator<Item = &SubscriberId> {
		self.0.iter()
	}

	/// Returns the ids sorted ascending.
	pub fn to_sorted_vec(&self) -> Vec<SubscriberId> {
		let mut ids = self.0.iter().copied().collect::<Vec<_>>();

		ids.sort_unstable();

		ids
	}
}
impl FromIterator<SubscriberId> for CoverageResult {
	fn from_iter<I>(iter: I) -> Self
	where
		I: IntoIterator<Item = SubscriberId>,
	{
		Self(iter.into_iter().collect())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn session_token_rejects_only_empty_values_and_redacts() {
		assert_eq!(SessionToken::new(""), Err(TokenError::Empty));
		assert_eq!(
			SessionToken::new("ab cd/ef").map(|token| token.expose().to_owned()),
			Ok("ab cd/ef".to_owned())
		);

		let token = SessionToken::new("abc123").expect("Token fixture should be valid.");

		assert_eq!(token.expose(), "abc123");
		assert_eq!(format!("{token:?}"), "SessionToken(\"<redacted>\")");
		assert_eq!(format!("{token}"), "<redacted>");
	}

	#[test]
	fn category_set_deduplicates_and_orders() {
		let set = ["Sports", "News", "Sports", "Auto"].into_iter().collect::<CategorySet>();

		assert_eq!(set.len(), 3);
		assert!(set.contains("News"));
		assert_eq!(set.iter().map(|c| c.as_ref()).collect::<Vec<_>>(), ["Auto", "News", "Sports"]);
	}

	#[test]
	fn subscriber_decodes_camel_case_and_collapses_duplicates() {
		let subscriber: Subscriber = serde_json::from_str(
			r#"{"id":"0a8f6f0e-2b4e-4f6a-9c62-5d1b8d0f3c11","firstName":"Ada","lastName":"Byron","magazineIds":[3,1,3]}"#,
		)
		.expect("Subscriber fixture should decode.");

		assert_eq!(subscriber.first_name, "Ada");
		assert_eq!(subscriber.magazine_ids, HashSet::from([1, 3]));
	}
}
