//! Canned care guides keyed by plant name.
//!
//! Guides live as markdown under `assets/` and are compiled into the binary.
//! A plant is matched against the ordered [`GUIDES`] table by substring, first
//! hit wins, and the selected guide is personalised with the plant's name,
//! advice for any reported issue and notes on the user's description.

use regex::{NoExpand, RegexBuilder};
use rust_embed::RustEmbed;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

#[derive(RustEmbed)]
#[folder = "assets/"]
struct CareAssets;

#[derive(Debug, Error)]
pub enum CareGuideError {
    #[error("care guide asset missing: {0}")]
    MissingAsset(&'static str),
    #[error("invalid guide key pattern: {0}")]
    Pattern(#[from] regex::Error),
}

#[derive(Debug)]
pub struct GuideEntry {
    pub key: &'static str,
    asset: &'static str,
    pub tags: &'static [&'static str],
}

impl GuideEntry {
    pub fn is_default(&self) -> bool {
        self.key == DEFAULT_KEY
    }

    fn content(&self) -> Result<String, CareGuideError> {
        asset_text(self.asset)
    }
}

const DEFAULT_KEY: &str = "default";

/// Lookup order matters: the first key contained in the name or species wins.
pub const GUIDES: &[GuideEntry] = &[
    GuideEntry {
        key: DEFAULT_KEY,
        asset: "care_guides/default.md",
        tags: &["watering", "light", "fertilizing", "seasonal care", "pests"],
    },
    GuideEntry {
        key: "monstera",
        asset: "care_guides/monstera.md",
        tags: &["watering", "light", "humidity", "propagation", "fertilizing"],
    },
    GuideEntry {
        key: "pothos",
        asset: "care_guides/pothos.md",
        tags: &["watering", "light", "propagation", "beginner-friendly", "air-purifying"],
    },
    GuideEntry {
        key: "snake plant",
        asset: "care_guides/snake_plant.md",
        tags: &["drought-tolerant", "low-maintenance", "air-purifying", "watering", "light"],
    },
    GuideEntry {
        key: "fiddle leaf fig",
        asset: "care_guides/fiddle_leaf_fig.md",
        tags: &["watering", "light", "humidity", "temperamental", "leaf health"],
    },
    GuideEntry {
        key: "peace lily",
        asset: "care_guides/peace_lily.md",
        tags: &["watering", "humidity", "air-purifying", "flowering", "low-light"],
    },
    GuideEntry {
        key: "zz plant",
        asset: "care_guides/zz_plant.md",
        tags: &["drought-tolerant", "low-maintenance", "low-light", "air-purifying", "watering"],
    },
    GuideEntry {
        key: "aloe vera",
        asset: "care_guides/aloe_vera.md",
        tags: &["medicinal", "drought-tolerant", "watering", "light", "propagation"],
    },
    GuideEntry {
        key: "orchid",
        asset: "care_guides/orchid.md",
        tags: &["watering", "humidity", "flowering", "light", "air circulation"],
    },
    GuideEntry {
        key: "succulent",
        asset: "care_guides/succulent.md",
        tags: &["drought-tolerant", "watering", "light", "propagation", "soil"],
    },
    GuideEntry {
        key: "fern",
        asset: "care_guides/fern.md",
        tags: &["humidity", "watering", "indirect light", "moisture", "tropical"],
    },
    GuideEntry {
        key: "cactus",
        asset: "care_guides/cactus.md",
        tags: &["drought-tolerant", "light", "watering", "dormancy", "desert plants"],
    },
    GuideEntry {
        key: "calathea",
        asset: "care_guides/calathea.md",
        tags: &["humidity", "leaf pattern", "filtered water", "tropical", "prayer plant"],
    },
];

/// Input to the guide generator
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
pub struct GuideRequest {
    pub plant_name: String,
    pub plant_species: Option<String>,
    pub care_issue: Option<String>,
    pub plant_description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guide {
    pub content: String,
    pub tags: Vec<String>,
}

fn asset_text(path: &'static str) -> Result<String, CareGuideError> {
    let file = CareAssets::get(path).ok_or(CareGuideError::MissingAsset(path))?;
    Ok(String::from_utf8_lossy(&file.data).trim_end().to_string())
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// First table entry whose key appears in the name or species.
pub fn match_guide(plant_name: &str, plant_species: Option<&str>) -> Option<&'static GuideEntry> {
    let name = plant_name.trim().to_lowercase();
    let species = plant_species.map(str::to_lowercase).unwrap_or_default();

    GUIDES
        .iter()
        .find(|entry| name.contains(entry.key) || species.contains(entry.key))
}

/// Entry used for personalised content, `None` when only the default applies
fn specific_guide(plant_name: &str, plant_species: Option<&str>) -> Option<&'static GuideEntry> {
    match_guide(plant_name, plant_species).filter(|entry| !entry.is_default())
}

fn default_entry() -> &'static GuideEntry {
    &GUIDES[0]
}

fn replace_key(text: &str, key: &str, plant_name: &str) -> Result<String, CareGuideError> {
    let pattern = RegexBuilder::new(&regex::escape(key))
        .case_insensitive(true)
        .build()?;
    Ok(pattern.replace_all(text, NoExpand(plant_name)).into_owned())
}

fn guide_heading(plant_name: &str, plant_species: Option<&str>) -> String {
    match non_empty(plant_species) {
        Some(species) => format!("# Care Guide for {plant_name} ({species})"),
        None => format!("# Care Guide for {plant_name}"),
    }
}

/// Swap the H1 of a guide for the plant's own heading
fn with_heading(content: &str, heading: &str) -> String {
    match content.split_once('\n') {
        Some((_, body)) => format!("{heading}\n{body}"),
        None => heading.to_string(),
    }
}

pub fn generate(request: &GuideRequest) -> Result<Guide, CareGuideError> {
    let name = request.plant_name.trim();
    let species = request.plant_species.as_deref();

    let (mut content, entry) = match specific_guide(name, species) {
        Some(entry) => (replace_key(&entry.content()?, entry.key, name)?, entry),
        None => {
            let entry = default_entry();
            let heading = guide_heading(name, species);
            (with_heading(&entry.content()?, &heading), entry)
        }
    };

    if let Some(issue) = non_empty(request.care_issue.as_deref()) {
        content.push_str(&format!("\n\n## Specific Issue: {issue}\n"));
        content.push_str(&issue_advice(issue)?);
    }

    if let Some(description) = non_empty(request.plant_description.as_deref()) {
        content.push_str("\n\n## Based on Your Description\n");
        content.push_str(&format!("You mentioned: \"{description}\"\n\n"));
        content.push_str(&description_advice(description));
    }

    content.push_str(&format!(
        "\n\n---\n\nThis care guide is specifically tailored for your {name}. Adjust \
         recommendations based on your specific growing conditions and observe how your \
         plant responds. Remember that each plant is unique, and care requirements may \
         vary slightly based on your home environment."
    ));

    Ok(Guide {
        content,
        tags: entry.tags.iter().map(|tag| tag.to_string()).collect(),
    })
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

/// Advice for a reported problem, picked by keywords in the issue text.
pub fn issue_advice(issue: &str) -> Result<String, CareGuideError> {
    let lower = issue.to_lowercase();

    let asset = if lower.contains("yellow") && contains_any(&lower, &["leaf", "leaves"]) {
        "issue_advice/yellow_leaves.md"
    } else if lower.contains("brown") && contains_any(&lower, &["tip", "edge"]) {
        "issue_advice/brown_tips.md"
    } else if contains_any(&lower, &["drooping", "wilting"]) {
        "issue_advice/drooping.md"
    } else if lower.contains("spots") && contains_any(&lower, &["brown", "black"]) {
        "issue_advice/dark_spots.md"
    } else if lower.contains("spots") && contains_any(&lower, &["white", "powder"]) {
        "issue_advice/white_spots.md"
    } else if contains_any(&lower, &["stretching", "leggy"]) {
        "issue_advice/leggy_growth.md"
    } else if contains_any(&lower, &["pest", "bug", "insect"]) {
        "issue_advice/pests.md"
    } else {
        return Ok(asset_text("issue_advice/general.md")?.replace("{issue}", issue));
    };

    asset_text(asset)
}

const SUNNY_WINDOW: &str = "You mentioned a south or west-facing location, which typically provides bright or direct light. Monitor your plant for signs of sun stress (scorching or bleaching of leaves) especially during summer months when light is most intense. Consider a sheer curtain to filter the strongest midday and afternoon light.";
const GENTLE_WINDOW: &str = "Your north or east-facing location provides gentler light, which works well for many houseplants. If your plant shows signs of stretching toward the light, it may need a brighter spot or rotating regularly.";
const LOW_LIGHT: &str = "You've described a low light environment. Consider low-light tolerant plants like snake plants, ZZ plants, or pothos. Most flowering plants and those with variegated leaves will need brighter conditions to thrive. You might want to consider supplemental grow lights if natural light is limited.";
const FORGETFUL_WATERING: &str = "Since you mentioned you sometimes forget to water or have a busy schedule, consider plants that tolerate irregular watering like succulents, ZZ plants, snake plants, or pothos. Setting calendar reminders or using a moisture meter can help establish a better watering routine.";
const OVERWATERING: &str = "You mentioned concerns about overwatering. Always check that soil is dry to the appropriate depth before watering again. Consider using pots with drainage holes and well-draining soil mixes. A moisture meter can be helpful for those who tend to overwater.";
const HUMID_HOME: &str = "Your description indicates a potentially humid environment. Plants like ferns, calatheas, and other tropical varieties would likely thrive in these conditions. If you're growing plants that prefer lower humidity, ensure good air circulation to prevent fungal issues.";
const DRY_HOME: &str = "Your home environment sounds like it may be on the drier side. Consider using a humidifier or pebble trays for humidity-loving plants. Plants like succulents, cacti, and snake plants will naturally do better in drier conditions.";
const PETS: &str = "You mentioned having pets. It's important to verify that your plants are non-toxic to animals. Some pet-friendly options include spider plants, Boston ferns, areca palms, and calathea varieties. Avoid lilies, pothos, philodendrons, and many other common houseplants that can be toxic if ingested by pets.";
const OBSERVE: &str = "Based on your description, continue to observe how your plant responds to its current care routine and environment. Make small adjustments as needed based on your plant's signals (leaf color, growth patterns, soil moisture). Taking progress photos every few weeks can help you track subtle changes in your plant's health and growth.";

/// Notes on light, watering habits, humidity and pets drawn from the
/// user's free-text description.
pub fn description_advice(description: &str) -> String {
    let lower = description.to_lowercase();
    let mut paragraphs = Vec::new();

    if contains_any(&lower, &["window", "light"]) {
        if contains_any(&lower, &["south", "west"]) {
            paragraphs.push(SUNNY_WINDOW);
        } else if contains_any(&lower, &["north", "east"]) {
            paragraphs.push(GENTLE_WINDOW);
        } else if contains_any(&lower, &["low light", "dark"]) {
            paragraphs.push(LOW_LIGHT);
        }
    }

    if contains_any(&lower, &["water", "moist", "dry"]) {
        if contains_any(&lower, &["forget", "busy"]) {
            paragraphs.push(FORGETFUL_WATERING);
        } else if contains_any(&lower, &["overwater", "too much water"]) {
            paragraphs.push(OVERWATERING);
        }
    }

    if contains_any(&lower, &["humid", "bathroom", "kitchen"]) {
        paragraphs.push(HUMID_HOME);
    } else if contains_any(&lower, &["dry", "heat", "air conditioner"]) {
        paragraphs.push(DRY_HOME);
    }

    if contains_any(&lower, &["cat", "dog", "pet"]) {
        paragraphs.push(PETS);
    }

    if paragraphs.is_empty() {
        return OBSERVE.to_string();
    }
    paragraphs.join("\n\n")
}

/// Short watering and light guide shown on a plant's detail page.
pub fn basic_instructions(
    plant_name: &str,
    plant_species: Option<&str>,
) -> Result<String, CareGuideError> {
    let name = plant_name.trim();

    if let Some(entry) = specific_guide(name, plant_species) {
        let content = entry.content()?;
        let intro_and_two_sections = content.split("##").take(3).collect::<Vec<_>>().join("##");
        return replace_key(intro_and_two_sections.trim_end(), entry.key, name);
    }

    Ok(format!(
        "{}\n\n\
         ## Watering\n\
         - Check the top 1-2 inches of soil; water when dry\n\
         - Use room temperature water to avoid shocking roots\n\
         - Adjust watering frequency based on season and environment\n\n\
         ## Light\n\
         - Most houseplants prefer bright, indirect light\n\
         - Avoid direct sunlight which can scorch leaves\n\
         - Rotate plants regularly to ensure even growth",
        guide_heading(name, plant_species)
    ))
}

/// Title stored with a generated recommendation
pub fn recommendation_title(plant_name: &str, care_issue: Option<&str>) -> String {
    let name = plant_name.trim();
    match non_empty(care_issue) {
        Some(issue) => {
            let mut chars = issue.chars();
            let capitalized: String = chars
                .next()
                .map(|first| first.to_uppercase().chain(chars).collect())
                .unwrap_or_default();
            format!("{name}: {capitalized}")
        }
        None => format!("Care tips for your {name}"),
    }
}
