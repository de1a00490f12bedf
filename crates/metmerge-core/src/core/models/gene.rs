use super::annotation::Annotations;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Gene {
    pub id: String,
    pub name: String,
    pub annotations: Annotations,
}

impl Gene {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            ..Default::default()
        }
    }
}
