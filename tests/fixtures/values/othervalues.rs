/// Number defines an amount of things.
pub type Number = i64;

/// Other carries settings shared with the sibling chart.
pub struct Other {
    #[serde(rename = "truth")]
    pub truth: bool,
    #[serde(rename = "values")]
    pub values: Vec<String>,
}
