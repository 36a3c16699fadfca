use othervalues;

/// Values defines the configuration for this chart.
pub struct Values {
    /// Config defines the configuration for this chart.
    #[serde(rename = "config")]
    pub config: Config,
    /// Count defines the number of things.
    #[serde(rename = "count")]
    pub count: othervalues::Number,
    #[serde(rename = "unused")]
    pub unused: String,
    #[serde(rename = "image")]
    pub image: String,
    #[serde(rename = "other")]
    pub other: othervalues::Other,
}

/// Config defines the configuration for an object.
pub struct Config {
    /// X is cool
    #[serde(rename = "x")]
    pub x: String,
    /// Y is not.
    #[serde(rename = "y")]
    pub y: bool,
    #[serde(rename = "m")]
    pub m: BTreeMap<String, String>,
}

/// DEFAULT_VALUES defines the default values for the chart.
pub static DEFAULT_VALUES: Values = Values {
    // 8 is the best.
    count: 8,
    // this is a test comment
    config: Config {
        x: "hello",
        // we set y to false because it's better that way.
        y: false,
        // map m defines greetings and goodbyes
        m: btreemap! {
            "hello" => "world",
            // sleep well little moon
            "goodbye" => "moon",
        },
    },
    // y
    image: "hi",
    other: othervalues::Other {
        // We are not lying.
        truth: true,
        // Values are cool.
        values: vec![
            // does it?
            "hello",
            // does this automagically work?
            "abc",
        ],
    },
};
