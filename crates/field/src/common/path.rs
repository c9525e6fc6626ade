use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Key(String),
    Index(usize),
}

/// Location of a value inside the decoded document, e.g. `resources[0].with[1].count`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPath {
    segments: Vec<Segment>,
}

impl FieldPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn key(&self, key: &str) -> Self {
        let mut path = self.clone();
        path.segments.push(Segment::Key(key.to_string()));
        path
    }

    pub fn index(&self, index: usize) -> Self {
        let mut path = self.clone();
        path.segments.push(Segment::Index(index));
        path
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }
}

impl Display for FieldPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "<document>");
        }
        for (idx, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Key(key) if idx == 0 => write!(f, "{key}")?,
                Segment::Key(key) => write!(f, ".{key}")?,
                Segment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::FieldPath;

    #[test]
    fn test_path_display() {
        let path = FieldPath::root()
            .key("resources")
            .index(0)
            .key("with")
            .index(1)
            .key("count");
        assert_eq!(path.to_string(), "resources[0].with[1].count");
        assert_eq!(FieldPath::root().to_string(), "<document>");
        assert_eq!(FieldPath::root().index(2).to_string(), "[2]");
    }
}
