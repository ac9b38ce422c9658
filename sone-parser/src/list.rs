use log::trace;
use std::convert::Infallible;

use crate::ConfigurationReader;

/// Reads the records `<prefix>/0`, `<prefix>/1`, ... until the first index
/// whose `<key_field>` is unset.
///
/// `read` gets the record prefix and the value of the key field. Records after
/// a gap are never looked at.
pub fn parse_list<C, T, E, F>(
    configuration: &C,
    prefix: &str,
    key_field: &str,
    mut read: F,
) -> Result<Vec<T>, E>
where
    C: ConfigurationReader + ?Sized,
    F: FnMut(&str, String) -> Result<T, E>,
{
    let mut records = Vec::new();
    loop {
        let record_prefix = format!("{}/{}", prefix, records.len());
        let key = match configuration.get_string(&format!("{}/{}", record_prefix, key_field)) {
            Some(key) => key,
            None => break,
        };
        records.push(read(&record_prefix, key)?);
    }
    trace!("Read {} records from {}", records.len(), prefix);
    Ok(records)
}

/// Reads the `ID` field of every record of the list at `prefix`.
pub fn parse_ids<C>(configuration: &C, prefix: &str) -> Vec<String>
where
    C: ConfigurationReader + ?Sized,
{
    parse_list(configuration, prefix, "ID", |_, id| Ok::<_, Infallible>(id)).unwrap_or_default()
}
