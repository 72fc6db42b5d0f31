use shared::domain::ContentType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TipCategory {
    pub title: &'static str,
    pub tips: &'static [&'static str],
}

const IMAGE_TIPS: &[TipCategory] = &[
    TipCategory {
        title: "Characters",
        tips: &[
            "an elegant young woman with long flowing hair",
            "a friendly middle-aged man in business attire",
            "an innocent child with clear bright eyes",
            "a kind elderly person with a weathered face",
        ],
    },
    TipCategory {
        title: "Scenes",
        tips: &[
            "a park in full cherry blossom, sunlight filtering through leaves",
            "a bustling city at night with flickering neon lights",
            "a cozy cafe with warm ambient lighting",
            "a majestic seaside sunset, waves brushing the sand",
        ],
    },
    TipCategory {
        title: "Photography",
        tips: &[
            "shot on an 85mm lens, shallow depth of field",
            "wide-angle shot showing a vast panorama",
            "macro photography capturing fine texture",
            "backlit with a dreamy rim light",
        ],
    },
    TipCategory {
        title: "Art styles",
        tips: &[
            "hyper-realistic, rich detail and layering",
            "impressionist style with visible brush strokes",
            "vintage film look, warm nostalgic tones",
            "modern minimalism, clean lines",
        ],
    },
];

const VIDEO_TIPS: &[TipCategory] = &[
    TipCategory {
        title: "Action",
        tips: &[
            "a kitten slowly stretching in the sunlight",
            "waves gently lapping the beach as foam fades",
            "cherry blossom petals dancing in the breeze",
            "clouds drifting and reshaping across a blue sky",
        ],
    },
    TipCategory {
        title: "Camera movement",
        tips: &[
            "slow wide-angle push-in revealing detail",
            "camera pans to follow the subject",
            "aerial view slowly descending toward the scene",
            "360-degree orbit around the subject",
        ],
    },
    TipCategory {
        title: "Lighting",
        tips: &[
            "warm golden-hour light",
            "soft morning light streaming through a window",
            "sunset sky with a colour gradient",
            "a quiet moonlit night with scattered stars",
        ],
    },
    TipCategory {
        title: "Emotion",
        tips: &[
            "joyful laughter, eyes full of delight",
            "a tender, heartfelt gaze",
            "calm contemplation, at peace",
            "a surprised expression, eyes sparkling",
        ],
    },
];

pub fn tips_for(content: ContentType) -> &'static [TipCategory] {
    match content {
        ContentType::Image => IMAGE_TIPS,
        ContentType::Video => VIDEO_TIPS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_content_type_has_four_categories_of_four() {
        for content in ContentType::ALL {
            let categories = tips_for(*content);
            assert_eq!(categories.len(), 4);
            assert!(categories.iter().all(|category| category.tips.len() == 4));
        }
        assert_eq!(tips_for(ContentType::Video)[1].title, "Camera movement");
    }
}
