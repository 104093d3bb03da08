//! The fixed set of views requested for every reference image.
//!
//! Catalog order is the output order of every [`GenerationRun`](crate::GenerationRun).

use crate::models::{ViewDescriptor, ViewType};

macro_rules! view_prompt {
    ($lead:literal) => {
        concat!(
            $lead,
            " Generate a high-resolution photographic view of the subject from the provided reference image. ",
            "Enforce studio soft lighting, a neutral background, and consistent geometry and colors across views. ",
            "Maintain photorealism with no background clutter."
        )
    };
}

pub static VIEW_CATALOG: [ViewDescriptor; 6] = [
    ViewDescriptor {
        label: ViewType::Front,
        prompt_text: view_prompt!("Front view: a centered, straight-on photograph."),
    },
    ViewDescriptor {
        label: ViewType::Back,
        prompt_text: view_prompt!("Back view: a centered photograph from the back."),
    },
    ViewDescriptor {
        label: ViewType::Left,
        prompt_text: view_prompt!(
            "Left side view: a true 90-degree profile photograph from the left."
        ),
    },
    ViewDescriptor {
        label: ViewType::Right,
        prompt_text: view_prompt!(
            "Right side view: a true 90-degree profile photograph from the right."
        ),
    },
    ViewDescriptor {
        label: ViewType::Top,
        prompt_text: view_prompt!(
            "Top view: a bird's-eye photograph, looking directly down from above."
        ),
    },
    ViewDescriptor {
        label: ViewType::Bottom,
        prompt_text: view_prompt!(
            "Bottom view: a worm's-eye photograph, looking directly up from below."
        ),
    },
];

pub fn descriptor(view: ViewType) -> &'static ViewDescriptor {
    // ViewType discriminants follow catalog order
    &VIEW_CATALOG[view as usize]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_order_matches_view_types() {
        let labels: Vec<ViewType> = VIEW_CATALOG.iter().map(|d| d.label).collect();
        assert_eq!(labels, ViewType::ALL.to_vec());
    }

    #[test]
    fn test_prompts_share_base_and_differ() {
        for d in VIEW_CATALOG.iter() {
            assert!(d.prompt_text.contains("studio soft lighting"));
            assert!(d.prompt_text.starts_with(d.label.as_str()));
        }
        let prompts: HashSet<&str> = VIEW_CATALOG.iter().map(|d| d.prompt_text).collect();
        assert_eq!(prompts.len(), 6);
    }

    #[test]
    fn test_descriptor_lookup() {
        for view in ViewType::ALL {
            assert_eq!(descriptor(view).label, view);
        }
    }
}
