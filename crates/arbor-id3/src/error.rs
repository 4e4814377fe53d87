/// Errors from catalog construction, dataset encoding, training and evaluation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Id3Error {
    /// Returned when the catalog cannot describe a usable attribute space:
    /// an attribute with zero possible values or zero class labels.
    #[error("invalid catalog: {reason}")]
    ConfigurationError {
        /// Human-readable description of the defect.
        reason: String,
    },

    /// Returned when a label is looked up in a domain that does not contain it.
    #[error("label \"{label}\" is not a member of domain \"{domain}\"")]
    OutOfRange {
        /// Name of the domain (attribute name or `class`).
        domain: String,
        /// The label that was not found.
        label: String,
    },

    /// Returned when the same label is declared twice in one domain.
    #[error("label \"{label}\" appears more than once in domain \"{domain}\"")]
    DuplicateValue {
        /// Name of the domain.
        domain: String,
        /// The repeated label.
        label: String,
    },

    /// Returned when a domain has more labels than a [`ValueIndex`](crate::ValueIndex) can address.
    #[error("domain \"{domain}\" has {size} values, at most {max} are supported")]
    DomainTooLarge {
        /// Name of the domain.
        domain: String,
        /// Number of labels declared.
        size: usize,
        /// Largest supported domain size.
        max: usize,
    },

    /// Returned when training is attempted on zero instances.
    #[error("training set has zero instances")]
    EmptyTrainingSet,

    /// Returned when an instance row has the wrong number of columns.
    #[error("instance {instance_index} has {got} values, expected {expected}")]
    InstanceWidthMismatch {
        /// The expected row width.
        expected: usize,
        /// The actual row width.
        got: usize,
        /// Zero-based row index of the offending instance.
        instance_index: usize,
    },

    /// Returned when an encoded value lies outside its attribute's domain.
    #[error("instance {instance_index}: value {value} is outside domain \"{domain}\" of size {domain_size}")]
    ValueOutOfRange {
        /// Zero-based row index of the offending instance.
        instance_index: usize,
        /// Name of the domain (attribute name or `class`).
        domain: String,
        /// The encoded value.
        value: usize,
        /// Number of labels in the domain.
        domain_size: usize,
    },

    /// Returned when a classification query has the wrong number of attribute values.
    #[error("classification input has {got} values, expected {expected}")]
    QueryWidthMismatch {
        /// The number of attributes the classifier was trained on.
        expected: usize,
        /// The actual number of values supplied.
        got: usize,
    },

    /// Returned when evaluation receives prediction and truth sequences of different lengths.
    #[error("evaluation received {actual} true labels but {predicted} predictions")]
    PredictionCountMismatch {
        /// Number of true labels.
        actual: usize,
        /// Number of predictions.
        predicted: usize,
    },

    /// Returned when the hold-out test fraction is not in (0.0, 1.0).
    #[error("test_fraction must be in (0.0, 1.0), got {fraction}")]
    InvalidTestFraction {
        /// The invalid fraction.
        fraction: f64,
    },

    /// Returned when a classifier is paired with a catalog it was not trained on.
    #[error("catalog does not match classifier: {reason}")]
    CatalogMismatch {
        /// Human-readable description of the mismatch.
        reason: String,
    },

    /// Returned when evaluation is attempted on zero instances.
    #[error("evaluation set has zero instances")]
    EmptyEvaluationSet,
}
