//! Speakable phrase building
//!
//! Turns maneuver and road-name data into `SpeakableName` values. Whether a
//! structured name or a single string is produced depends on the attached
//! sink's capabilities, never on the phrase being built.

mod name;
mod normalize;

pub use name::{NameTriple, SpeakableName, StructuredUtterance};
pub use normalize::speakable_point_name;

use guidance_types::GuidanceSettings;

use crate::command::SinkCapabilities;
use crate::route::{LocalizedName, Maneuver, RoadSegment};

/// Builds speakable names for the currently attached voice
#[derive(Debug, Clone, Copy)]
pub struct PhraseBuilder<'a> {
    settings: &'a GuidanceSettings,
    capabilities: Option<&'a SinkCapabilities>,
}

impl<'a> PhraseBuilder<'a> {
    pub fn new(settings: &'a GuidanceSettings, capabilities: Option<&'a SinkCapabilities>) -> Self {
        Self {
            settings,
            capabilities,
        }
    }

    fn language(&self) -> Option<&str> {
        self.capabilities.map(|c| c.language.as_str())
    }

    /// Normalize a point or road name for the active voice
    pub fn point_name(&self, name: &str) -> String {
        speakable_point_name(name, self.language())
    }

    fn term(&self, name: Option<&str>) -> Option<String> {
        name.filter(|n| !n.is_empty())
            .map(|n| self.point_name(n))
            .filter(|n| !n.is_empty())
    }

    fn localized(&self, name: Option<&LocalizedName>) -> Option<String> {
        let name = name?.resolve(
            self.settings.preferred_locale.as_deref(),
            self.settings.transliterate_names,
        );
        self.term(Some(name))
    }

    /// Road-name parameter for a maneuver prompt.
    ///
    /// With `include_destination` false the destination fields are left
    /// empty so the destination is not repeated.
    pub fn street_name(
        &self,
        current: Option<&RoadSegment>,
        maneuver: Option<&Maneuver>,
        include_destination: bool,
    ) -> SpeakableName {
        let Some(maneuver) = maneuver else {
            return SpeakableName::Empty;
        };
        if !self.settings.speak_street_names {
            return SpeakableName::Empty;
        }

        let structured = self.capabilities.is_some_and(|c| c.structured_names);
        if !structured {
            return self
                .term(maneuver.ref_code.as_deref())
                .or_else(|| self.term(maneuver.street_name.as_deref()))
                .map(SpeakableName::Plain)
                .unwrap_or_default();
        }

        let next = NameTriple {
            ref_code: self.term(maneuver.ref_code.as_deref()),
            street: self.term(maneuver.street_name.as_deref()),
            destination: if include_destination {
                self.term(maneuver.destination_name.as_deref())
            } else {
                None
            },
        };
        let current = current.map(|road| NameTriple {
            ref_code: self.term(road.ref_code.as_deref()),
            street: self.localized(road.name.as_ref()),
            destination: if include_destination {
                self.localized(road.destination.as_ref())
            } else {
                None
            },
        });

        SpeakableName::Structured(StructuredUtterance { next, current })
    }
}
