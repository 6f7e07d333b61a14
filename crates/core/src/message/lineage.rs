//! Causal continuation between two metadata records.
//!
//! `follow` stamps the candidate's causation pointer from the prior record's
//! source identity, then checks the whole relationship with `follows`.
//! Correlation and reply streams are expected to be copied by the caller
//! before `follow` runs.

use crate::{
    error::{CausewayError, Result},
    message::MetadataRecord,
};

/// True when `candidate` is a continuation of `prior`: its causation points
/// at prior's source, and both share correlation and reply streams.
///
/// An undefined identifier on either side never matches.
pub fn follows(candidate: &MetadataRecord, prior: &MetadataRecord) -> bool {
    let caused_by_prior = match (candidate.causation_identifier(), prior.source_identifier()) {
        (Some(causation), Some(source)) => causation == source,
        _ => false,
    };

    caused_by_prior
        && candidate.correlation_stream_name == prior.correlation_stream_name
        && candidate.reply_stream_name == prior.reply_stream_name
}

/// Stamps `candidate` as caused by `prior`.
///
/// On failure the causation fields stay stamped; the error carries both
/// records as they were at the time of the check.
pub fn follow(candidate: &mut MetadataRecord, prior: &MetadataRecord) -> Result<()> {
    candidate.causation_stream_name = prior.source_stream_name.clone();
    candidate.causation_position = prior.source_position;

    if !follows(candidate, prior) {
        tracing::warn!(
            causation = ?candidate.causation_event_identifier(),
            candidate_correlation = ?candidate.correlation_stream_name,
            prior_correlation = ?prior.correlation_stream_name,
            candidate_reply = ?candidate.reply_stream_name,
            prior_reply = ?prior.reply_stream_name,
            "lineage violation"
        );

        return Err(CausewayError::LineageViolation {
            candidate: Box::new(candidate.clone()),
            prior: Box::new(prior.clone()),
        });
    }

    tracing::debug!(
        causation = ?candidate.causation_event_identifier(),
        correlation = ?candidate.correlation_stream_name,
        "followed"
    );

    Ok(())
}

/// Exact match against the correlation stream name. A category prefix of
/// `stream_name` does not correlate.
pub fn correlated(record: &MetadataRecord, stream_name: &str) -> bool {
    record.correlation_stream_name.as_deref() == Some(stream_name)
}
