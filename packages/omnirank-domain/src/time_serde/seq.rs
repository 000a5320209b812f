use serde::{Deserialize as _, Deserializer, Serializer, ser::SerializeSeq as _};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

pub fn serialize<S>(value: &Option<Vec<OffsetDateTime>>, serializer: S) -> Result<S::Ok, S::Error>
where
	S: Serializer,
{
	let Some(values) = value else { return serializer.serialize_none() };
	let mut seq = serializer.serialize_seq(Some(values.len()))?;

	for value in values {
		let formatted = value.format(&Rfc3339).map_err(serde::ser::Error::custom)?;

		seq.serialize_element(&formatted)?;
	}

	seq.end()
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Vec<OffsetDateTime>>, D::Error>
where
	D: Deserializer<'de>,
{
	let Some(raw) = Option::<Vec<String>>::deserialize(deserializer)? else { return Ok(None) };

	raw.iter()
		.map(|value| crate::time_serde::parse(value).map_err(serde::de::Error::custom))
		.collect::<Result<Vec<_>, _>>()
		.map(Some)
}
