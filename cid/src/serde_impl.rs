//! JSON-style link form: a CID serializes as `{"$link": "<text form>"}`.

use super::Cid;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Error as _};

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct Link<'a> {
    #[serde(rename = "$link", borrow)]
    link: std::borrow::Cow<'a, str>,
}

impl Serialize for Cid {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        Link {
            link: self.to_string().into(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Cid {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let link = Link::deserialize(deserializer)?;
        Cid::parse(&link.link)
            .map_err(|e| D::Error::custom(format_args!("parsing cid-link CID: {e}")))
    }
}
