//! User records and boundary validation
//!
//! A [`Record`] is what callers store in a heap: a free-form label and an
//! orderable value. Input arrives as an [`Entry`], a closed set of accepted
//! shapes that is validated once, at the heap boundary, before any node is
//! created.

use crate::node::NodeRef;
use crate::traits::HeapError;
use std::fmt;
use std::str::FromStr;

/// A labelled value stored in a heap
///
/// Two records are equal only when both label and value are equal; heap
/// ordering only ever looks at `value`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Record<V> {
    /// Free-form description
    pub label: String,
    /// Ordering key
    pub value: V,
}

impl<V> Record<V> {
    /// Creates a record from a label and a value
    pub fn new(label: impl Into<String>, value: V) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

impl<V: PartialOrd> Record<V> {
    /// Returns true when the value can take part in comparisons
    ///
    /// A value that is not comparable with itself (such as `f64::NAN`) would
    /// silently break the heap property, so it is rejected.
    pub fn is_orderable(&self) -> bool {
        self.value.partial_cmp(&self.value).is_some()
    }
}

impl<V: fmt::Display> fmt::Display for Record<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label, self.value)
    }
}

/// Parses `"label: value"`, splitting on the last colon
///
/// ```rust
/// use tree_heaps::record::Record;
///
/// let record: Record<i32> = "Star Wars: A New Hope: 93".parse().unwrap();
/// assert_eq!(record.label, "Star Wars: A New Hope");
/// assert_eq!(record.value, 93);
/// ```
impl<V: FromStr> FromStr for Record<V> {
    type Err = HeapError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let (label, value) = text.rsplit_once(':').ok_or(HeapError::InvalidInput)?;
        let label = label.trim();
        if label.is_empty() {
            return Err(HeapError::InvalidInput);
        }
        let value = value
            .trim()
            .parse()
            .map_err(|_| HeapError::InvalidInput)?;
        Ok(Record::new(label, value))
    }
}

/// Input accepted by heap operations
///
/// Every accepted shape is converted into a node (for insertion) or a record
/// (for lookup) by a single validating function; anything that fails
/// validation yields [`HeapError::InvalidInput`].
#[derive(Debug, Clone)]
pub enum Entry<V> {
    /// Positional `(label, value)` pair
    Pair(String, V),
    /// Named fields
    Keyed {
        /// Free-form description
        label: String,
        /// Ordering key
        value: V,
    },
    /// An existing node handle; its record is read, the node is left alone
    Node(NodeRef<V>),
}

impl<V: PartialOrd + Clone> Entry<V> {
    /// Validates the entry and returns the record it describes
    ///
    /// Node handles may be attached to a tree; only their contents are read.
    pub fn into_record(self) -> Result<Record<V>, HeapError> {
        let record = match self {
            Entry::Pair(label, value) | Entry::Keyed { label, value } => Record { label, value },
            Entry::Node(node) => node.record().ok_or(HeapError::InvalidInput)?,
        };
        if record.is_orderable() {
            Ok(record)
        } else {
            Err(HeapError::InvalidInput)
        }
    }

    /// Validates the entry and returns a fresh, unlinked node for insertion
    ///
    /// A node handle only contributes its record; the handle itself is never
    /// adopted, so no node can end up shared between two trees.
    pub fn into_node(self) -> Result<NodeRef<V>, HeapError> {
        self.into_record().map(NodeRef::from_record)
    }
}

impl<V> From<(&str, V)> for Entry<V> {
    fn from((label, value): (&str, V)) -> Self {
        Entry::Pair(label.to_string(), value)
    }
}

impl<V> From<(String, V)> for Entry<V> {
    fn from((label, value): (String, V)) -> Self {
        Entry::Pair(label, value)
    }
}

impl<V> From<Record<V>> for Entry<V> {
    fn from(record: Record<V>) -> Self {
        Entry::Keyed {
            label: record.label,
            value: record.value,
        }
    }
}

impl<V> From<&Record<V>> for Entry<V>
where
    V: Clone,
{
    fn from(record: &Record<V>) -> Self {
        Entry::from(record.clone())
    }
}

impl<V> From<NodeRef<V>> for Entry<V> {
    fn from(node: NodeRef<V>) -> Self {
        Entry::Node(node)
    }
}
