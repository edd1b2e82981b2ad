//! XML export of CP-nets and dominance queries.
//!
//! Features are written as `x1..xn` and values as `1..d`. A CP-net becomes a
//! `PREFERENCE-SPECIFICATION` document with one `PREFERENCE-STATEMENT` per
//! present CPT row; a dominance query becomes a `PREFERENCE-QUERY` naming the
//! specification file and the two outcomes to compare.

use std::fmt::Write as _;
use std::io;
use std::path::Path;

use crate::cpnet::CpNet;
use crate::outcome::Outcome;

const HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

fn variable(feature: usize) -> String {
    format!("x{}", feature + 1)
}

/// Escapes markup characters in text content.
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn to_io(e: std::fmt::Error) -> io::Error {
    io::Error::new(io::ErrorKind::Other, e)
}

impl CpNet {
    /// Renders the net as a `PREFERENCE-SPECIFICATION` document.
    pub fn to_xml_string(&self) -> Result<String, std::fmt::Error> {
        let mut xml = String::new();
        writeln!(xml, "{}", HEADER)?;
        writeln!(xml, "<PREFERENCE-SPECIFICATION>")?;

        for feature in 0..self.features() {
            writeln!(xml, "  <PREFERENCE-VARIABLE>")?;
            writeln!(xml, "    <VARIABLE-NAME>{}</VARIABLE-NAME>", variable(feature))?;
            for value in self.domain().feature_values() {
                writeln!(xml, "    <DOMAIN-VALUE>{}</DOMAIN-VALUE>", value + 1)?;
            }
            writeln!(xml, "  </PREFERENCE-VARIABLE>")?;
        }

        for node in self.nodes() {
            let mut statement = 0;
            for (key, order) in node.cpt().rows() {
                let Some(order) = order else { continue };
                statement += 1;
                writeln!(xml, "  <PREFERENCE-STATEMENT>")?;
                writeln!(xml, "    <STATEMENT-ID>p{}_{}</STATEMENT-ID>", node.feature() + 1, statement)?;
                writeln!(xml, "    <PREFERENCE-VARIABLE>{}</PREFERENCE-VARIABLE>", variable(node.feature()))?;
                for (&parent, &value) in node.parents().iter().zip(&key) {
                    writeln!(xml, "    <CONDITION>{}={}</CONDITION>", variable(parent), value + 1)?;
                }
                for pair in order.windows(2) {
                    writeln!(xml, "    <PREFERENCE>{}:{}</PREFERENCE>", pair[0] + 1, pair[1] + 1)?;
                }
                writeln!(xml, "  </PREFERENCE-STATEMENT>")?;
            }
        }

        writeln!(xml, "</PREFERENCE-SPECIFICATION>")?;
        Ok(xml)
    }

    /// Writes [`to_xml_string`](Self::to_xml_string) to `path`.
    pub fn save_xml(&self, path: impl AsRef<Path>) -> io::Result<()> {
        std::fs::write(path, self.to_xml_string().map_err(to_io)?)
    }
}

/// Renders a `PREFERENCE-QUERY` asking whether `better` dominates `worse`
/// under the specification stored in `net_file`.
pub fn dominance_query(net_file: &str, better: &Outcome, worse: &Outcome) -> Result<String, std::fmt::Error> {
    let mut xml = String::new();
    writeln!(xml, "{}", HEADER)?;
    writeln!(xml, "<PREFERENCE-QUERY>")?;
    writeln!(xml, "  <PREFERENCE-SPECIFICATION-FILENAME>{}</PREFERENCE-SPECIFICATION-FILENAME>", escape(net_file))?;
    writeln!(xml, "  <QUERY-TYPE>DOMINANCE</QUERY-TYPE>")?;
    for (label, outcome) in [("BETTER", better), ("WORSE", worse)] {
        writeln!(xml, "  <OUTCOME>")?;
        writeln!(xml, "    <LABEL>{}</LABEL>", label)?;
        for (feature, value) in outcome.values().iter().enumerate() {
            writeln!(xml, "    <ASSIGNMENT>")?;
            writeln!(xml, "      <PREFERENCE-VARIABLE>{}</PREFERENCE-VARIABLE>", variable(feature))?;
            writeln!(xml, "      <VALUATION>{}</VALUATION>", value + 1)?;
            writeln!(xml, "    </ASSIGNMENT>")?;
        }
        writeln!(xml, "  </OUTCOME>")?;
    }
    writeln!(xml, "</PREFERENCE-QUERY>")?;
    Ok(xml)
}

/// Writes [`dominance_query`] to `path`.
pub fn save_dominance_query(path: impl AsRef<Path>, net_file: &str, better: &Outcome, worse: &Outcome) -> io::Result<()> {
    std::fs::write(path, dominance_query(net_file, better, worse).map_err(to_io)?)
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::cpnet::CpNode;
    use crate::cpt::Cpt;
    use crate::domain::Domain;

    fn net() -> CpNet {
        let x1 = CpNode::new(0, vec![], Cpt::new(3, 0, vec![Some(vec![1, 0, 2])]).unwrap());
        let x2 = CpNode::new(
            1,
            vec![0],
            Cpt::new(3, 1, vec![Some(vec![0, 1, 2]), None, Some(vec![2, 1, 0])]).unwrap(),
        );
        CpNet::new(Domain::new(2, 3), vec![x1, x2]).unwrap()
    }

    #[test]
    fn test_specification() {
        let xml = net().to_xml_string().unwrap();
        let expected = r#"<?xml version="1.0" encoding="UTF-8"?>
<PREFERENCE-SPECIFICATION>
  <PREFERENCE-VARIABLE>
    <VARIABLE-NAME>x1</VARIABLE-NAME>
    <DOMAIN-VALUE>1</DOMAIN-VALUE>
    <DOMAIN-VALUE>2</DOMAIN-VALUE>
    <DOMAIN-VALUE>3</DOMAIN-VALUE>
  </PREFERENCE-VARIABLE>
  <PREFERENCE-VARIABLE>
    <VARIABLE-NAME>x2</VARIABLE-NAME>
    <DOMAIN-VALUE>1</DOMAIN-VALUE>
    <DOMAIN-VALUE>2</DOMAIN-VALUE>
    <DOMAIN-VALUE>3</DOMAIN-VALUE>
  </PREFERENCE-VARIABLE>
  <PREFERENCE-STATEMENT>
    <STATEMENT-ID>p1_1</STATEMENT-ID>
    <PREFERENCE-VARIABLE>x1</PREFERENCE-VARIABLE>
    <PREFERENCE>2:1</PREFERENCE>
    <PREFERENCE>1:3</PREFERENCE>
  </PREFERENCE-STATEMENT>
  <PREFERENCE-STATEMENT>
    <STATEMENT-ID>p2_1</STATEMENT-ID>
    <PREFERENCE-VARIABLE>x2</PREFERENCE-VARIABLE>
    <CONDITION>x1=1</CONDITION>
    <PREFERENCE>1:2</PREFERENCE>
    <PREFERENCE>2:3</PREFERENCE>
  </PREFERENCE-STATEMENT>
  <PREFERENCE-STATEMENT>
    <STATEMENT-ID>p2_2</STATEMENT-ID>
    <PREFERENCE-VARIABLE>x2</PREFERENCE-VARIABLE>
    <CONDITION>x1=3</CONDITION>
    <PREFERENCE>3:2</PREFERENCE>
    <PREFERENCE>2:1</PREFERENCE>
  </PREFERENCE-STATEMENT>
</PREFERENCE-SPECIFICATION>
"#;
        assert_eq!(xml, expected);
    }

    #[test]
    fn test_statement_count_matches_present_rows() {
        let xml = net().to_xml_string().unwrap();
        assert_eq!(xml.matches("<PREFERENCE-STATEMENT>").count(), 3);
        assert_eq!(xml.matches("<PREFERENCE-VARIABLE>").count(), 5);
    }

    #[test]
    fn test_dominance_query() {
        let xml = dominance_query("net.xml", &Outcome::from([0, 1]), &Outcome::from([1, 1])).unwrap();
        assert!(xml.starts_with(HEADER));
        assert!(xml.contains("<PREFERENCE-SPECIFICATION-FILENAME>net.xml</PREFERENCE-SPECIFICATION-FILENAME>"));
        assert!(xml.contains("<LABEL>BETTER</LABEL>"));
        assert!(xml.contains("<LABEL>WORSE</LABEL>"));
        assert_eq!(xml.matches("<ASSIGNMENT>").count(), 4);
        assert!(xml.ends_with("</PREFERENCE-QUERY>\n"));
        let better = xml.find("BETTER").unwrap();
        let worse = xml.find("WORSE").unwrap();
        assert!(better < worse);
    }

    #[test]
    fn test_dominance_query_escapes_file_name() {
        let xml = dominance_query("a&b<c>.xml", &Outcome::from([0]), &Outcome::from([1])).unwrap();
        assert!(xml.contains("<PREFERENCE-SPECIFICATION-FILENAME>a&amp;b&lt;c&gt;.xml</PREFERENCE-SPECIFICATION-FILENAME>"));
        assert_eq!(escape("plain_0001.xml"), "plain_0001.xml");
    }

    #[test]
    fn test_save_roundtrip_to_disk() {
        let dir = std::env::temp_dir().join(format!("gencpnet-xml-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("net.xml");
        net().save_xml(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), net().to_xml_string().unwrap());
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
