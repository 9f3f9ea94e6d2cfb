// SPDX-License-Identifier: MIT

//! Line emission: tagged output records

use std::io::Write;

use crate::error::Result;

/// Writes assembled record bodies as InfluxDB line-protocol records.
///
/// Each line is `measurement,host_tag,source=category body`, flushed
/// immediately so a consumer reading the pipe sees complete lines even if
/// the process is interrupted mid-pass.
pub struct LineEmitter<W: Write> {
    out: W,
    measurement: String,
    host_tag: String,
}

impl<W: Write> LineEmitter<W> {
    pub fn new(out: W, measurement: &str, host_tag: &str) -> Self {
        Self {
            out,
            measurement: measurement.to_string(),
            host_tag: host_tag.to_string(),
        }
    }

    /// Emits one category line.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying sink fails.
    pub fn emit(&mut self, category: &str, body: &str) -> Result<()> {
        writeln!(
            self.out,
            "{},{},source={} {}",
            self.measurement, self.host_tag, category, body
        )?;
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_line_shape() {
        let mut sink = Vec::new();
        let mut emitter = LineEmitter::new(&mut sink, "FritzBox", "host=fritz.box");
        emitter.emit("wan", "UpTime=120i,ByteSendRate=44i").unwrap();
        assert_eq!(
            String::from_utf8(sink).unwrap(),
            "FritzBox,host=fritz.box,source=wan UpTime=120i,ByteSendRate=44i\n"
        );
    }

    #[test]
    fn test_emit_empty_body_keeps_tags() {
        let mut sink = Vec::new();
        let mut emitter = LineEmitter::new(&mut sink, "FritzBox", "host=fritz.box");
        emitter.emit("dsl", "").unwrap();
        assert_eq!(
            String::from_utf8(sink).unwrap(),
            "FritzBox,host=fritz.box,source=dsl \n"
        );
    }

    #[test]
    fn test_emit_one_line_per_category() {
        let mut sink = Vec::new();
        let mut emitter = LineEmitter::new(&mut sink, "FritzBox", "host=fritz.box");
        emitter.emit("general", "a=1i").unwrap();
        emitter.emit("status", "b=2i").unwrap();
        let text = String::from_utf8(sink).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.lines().all(|l| l.starts_with("FritzBox,host=fritz.box,source=")));
    }
}
