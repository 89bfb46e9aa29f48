//! Kafka consumer-group source
//!
//! Partitions are assigned by the group coordinator; order holds within a
//! partition only. Auto-commit is off: an offset is committed once the worker
//! has handled the message, so a restart resumes after the last handled one.

use async_trait::async_trait;
use rdkafka::config::ClientConfig;
use rdkafka::consumer::{CommitMode, Consumer, StreamConsumer};
use rdkafka::error::KafkaError;
use rdkafka::message::Message;
use rdkafka::{Offset, TopicPartitionList};

use super::{EventSource, SourceMessage};
use crate::error::{JobError, JobResult};

impl From<KafkaError> for JobError {
    fn from(err: KafkaError) -> Self {
        JobError::Source(err.to_string())
    }
}

pub struct KafkaSource {
    consumer: StreamConsumer,
    topic: String,
}

impl KafkaSource {
    /// Join `group_id` and subscribe to `topic`
    pub fn subscribe(brokers: &str, group_id: &str, topic: &str) -> JobResult<Self> {
        let consumer: StreamConsumer = consumer_config(brokers, group_id).create()?;
        consumer.subscribe(&[topic])?;
        tracing::info!(brokers = %brokers, group = %group_id, topic = %topic, "Subscribed to Kafka topic");
        Ok(Self {
            consumer,
            topic: topic.to_string(),
        })
    }
}

fn consumer_config(brokers: &str, group_id: &str) -> ClientConfig {
    let mut config = ClientConfig::new();
    config
        .set("bootstrap.servers", brokers)
        .set("group.id", group_id)
        .set("enable.auto.commit", "false")
        .set("auto.offset.reset", "earliest");
    config
}

/// Committed offsets name the next message to read
fn commit_position(msg: &SourceMessage) -> Offset {
    Offset::Offset(msg.offset + 1)
}

#[async_trait]
impl EventSource for KafkaSource {
    async fn next_message(&mut self) -> JobResult<Option<SourceMessage>> {
        let msg = self.consumer.recv().await?;
        Ok(Some(SourceMessage {
            topic: msg.topic().to_string(),
            partition: msg.partition(),
            offset: msg.offset(),
            key: msg.key().map(<[u8]>::to_vec),
            payload: msg.payload().map(<[u8]>::to_vec).unwrap_or_default(),
        }))
    }

    async fn commit(&mut self, msg: &SourceMessage) -> JobResult<()> {
        let mut positions = TopicPartitionList::new();
        positions.add_partition_offset(&msg.topic, msg.partition, commit_position(msg))?;
        self.consumer.commit(&positions, CommitMode::Async)?;
        Ok(())
    }

    async fn close(&mut self) -> JobResult<()> {
        self.consumer.unsubscribe();
        tracing::debug!(topic = %self.topic, "Kafka consumer unsubscribed");
        Ok(())
    }
}
