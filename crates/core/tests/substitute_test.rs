//! Substitute writer: recorded writes and replies.

use std::collections::HashMap;

use causeway_core::{
    CausewayError, Message, MessageData, MessagePayload, MetadataRecord, SubstituteWriter,
    WriteConfig, Writer, transform,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct StockReserved {
    order_id: String,
}

impl MessagePayload for StockReserved {
    const MESSAGE_TYPE: &'static str = "StockReserved";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct StockRejected {
    order_id: String,
}

impl MessagePayload for StockRejected {
    const MESSAGE_TYPE: &'static str = "StockRejected";
}

/// Tuple keys have no JSON form, so this payload never serializes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct StockTallied {
    tally: HashMap<(u8, u8), u8>,
}

impl MessagePayload for StockTallied {
    const MESSAGE_TYPE: &'static str = "StockTallied";
}

fn reply_message() -> Message<StockReserved> {
    let mut message = Message::new(StockReserved {
        order_id: "o-1".to_string(),
    });
    message.metadata = MetadataRecord {
        causation_stream_name: Some("reserveStock:command-o-1".to_string()),
        causation_position: Some(0),
        correlation_stream_name: Some("orders-o-1".to_string()),
        reply_stream_name: Some("orders:reply-o-1".to_string()),
        ..Default::default()
    };
    message
}

#[test]
fn reply_goes_to_the_reply_stream() -> anyhow::Result<()> {
    let mut message = reply_message();
    let mut writer = SubstituteWriter::new();

    writer.reply(&mut message)?;

    assert!(writer.replied());
    assert!(writer.replied_with(|_, stream| stream == "orders:reply-o-1"));
    assert_eq!(writer.replies(|data, _| data.id == message.id).len(), 1);
    assert!(!writer.written());
    Ok(())
}

#[test]
fn reply_clears_the_reply_stream_name() -> anyhow::Result<()> {
    let mut message = reply_message();
    let mut writer = SubstituteWriter::new();

    writer.reply(&mut message)?;

    assert_eq!(message.metadata.reply_stream_name, None);

    let recorded = writer.replies(|_, _| true);
    assert!(!recorded[0].message_data.metadata.contains_key("reply_stream_name"));
    assert_eq!(
        recorded[0].message_data.metadata["correlation_stream_name"],
        json!("orders-o-1")
    );
    Ok(())
}

#[test]
fn reply_without_reply_stream_fails() {
    let mut message = reply_message();
    message.metadata.clear_reply_stream_name();
    let mut writer = SubstituteWriter::new();

    let err = writer.reply(&mut message).unwrap_err();

    assert!(matches!(err, CausewayError::MissingReplyStreamName { .. }));
    assert!(!writer.replied());
}

#[test]
fn failed_reply_keeps_the_reply_stream_name() {
    let mut message = Message::new(StockTallied {
        tally: HashMap::from([((1, 2), 3)]),
    });
    message.metadata.reply_stream_name = Some("cmd-1".to_string());
    let mut writer = SubstituteWriter::new();

    let first = writer.reply(&mut message).unwrap_err();
    assert!(matches!(first, CausewayError::Json(_)));
    assert_eq!(message.metadata.reply_stream_name.as_deref(), Some("cmd-1"));
    assert!(!writer.replied());

    let retry = writer.reply(&mut message).unwrap_err();
    assert!(matches!(retry, CausewayError::Json(_)));
    assert_eq!(message.metadata.reply_stream_name.as_deref(), Some("cmd-1"));
}

#[test]
fn message_replies_decode_matching_type() -> anyhow::Result<()> {
    let mut reserved = reply_message();
    let mut rejected = Message::new(StockRejected {
        order_id: "o-2".to_string(),
    });
    rejected.metadata.reply_stream_name = Some("orders:reply-o-2".to_string());
    let mut writer = SubstituteWriter::new();

    writer.reply(&mut reserved)?;
    writer.reply(&mut rejected)?;

    let all = writer.message_replies::<StockReserved>(|_, _| true)?;
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].data, reserved.data);

    let by_stream =
        writer.message_replies::<StockRejected>(|_, stream| stream == "orders:reply-o-2")?;
    assert_eq!(by_stream.len(), 1);

    let none = writer.message_replies::<StockRejected>(|msg, _| msg.data.order_id == "o-1")?;
    assert!(none.is_empty());
    Ok(())
}

#[test]
fn writes_assign_positions_per_stream() -> anyhow::Result<()> {
    let mut writer = SubstituteWriter::new();

    let first = writer.write(&reply_message(), "inventory-o-1")?;
    let second = writer.write(&reply_message(), "inventory-o-1")?;
    let other = writer.write(&reply_message(), "inventory-o-2")?;

    assert_eq!((first, second, other), (0, 1, 0));
    assert_eq!(writer.writes(|_, stream| stream == "inventory-o-1").len(), 2);
    assert!(!writer.replied());
    Ok(())
}

#[test]
fn empty_batch_is_not_written() -> anyhow::Result<()> {
    let mut writer = SubstituteWriter::new();

    let err = writer.write_data(Vec::new(), "orders-1").unwrap_err();
    assert!(matches!(
        err,
        CausewayError::EmptyBatch { ref stream_name } if stream_name == "orders-1"
    ));
    assert!(matches!(
        writer.append(Vec::new(), "orders-1"),
        Err(CausewayError::EmptyBatch { .. })
    ));
    assert!(!writer.written());

    let position = writer.write(&reply_message(), "orders-1")?;
    assert_eq!(position, 0);
    Ok(())
}

#[test]
fn batch_returns_last_position() -> anyhow::Result<()> {
    let mut writer = SubstituteWriter::new();
    let batch = vec![
        transform::write(&reply_message())?,
        transform::write(&reply_message())?,
        transform::write(&reply_message())?,
    ];

    assert_eq!(writer.write_data(batch, "orders-1")?, 2);
    assert_eq!(writer.write(&reply_message(), "orders-1")?, 3);
    Ok(())
}

fn raw_with_transient_fields() -> anyhow::Result<MessageData> {
    let mut message_data = transform::write(&reply_message())?;
    message_data
        .metadata
        .insert("global_position".to_string(), json!(99));
    message_data
        .metadata
        .insert("source_stream_name".to_string(), json!("inventory-o-1"));
    Ok(message_data)
}

#[test]
fn default_writer_strips_transient_fields() -> anyhow::Result<()> {
    let mut writer = SubstituteWriter::new();

    writer.write_data(vec![raw_with_transient_fields()?], "inventory-o-1")?;

    let recorded = writer.writes(|_, _| true);
    let metadata = &recorded[0].message_data.metadata;
    assert!(!metadata.contains_key("global_position"));
    assert!(!metadata.contains_key("source_stream_name"));
    assert!(metadata.contains_key("correlation_stream_name"));
    Ok(())
}

#[test]
fn strict_writer_rejects_transient_fields() -> anyhow::Result<()> {
    let mut writer = SubstituteWriter::with_config(WriteConfig::strict());

    let err = writer
        .write_data(vec![raw_with_transient_fields()?], "inventory-o-1")
        .unwrap_err();

    assert!(matches!(err, CausewayError::TransientField { .. }));
    assert!(!writer.written());
    Ok(())
}

#[test]
fn strict_writer_accepts_projected_messages() -> anyhow::Result<()> {
    let mut message = reply_message();
    message.metadata.global_position = Some(12);
    message.metadata.source_stream_name = Some("inventory-o-1".to_string());
    message.metadata.source_position = Some(4);
    let mut writer = SubstituteWriter::with_config(WriteConfig::strict());

    writer.write(&message, "inventory-o-1")?;
    writer.reply(&mut message)?;

    assert!(writer.written());
    assert!(writer.replied());
    Ok(())
}
