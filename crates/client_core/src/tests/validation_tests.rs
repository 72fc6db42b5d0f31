use super::*;

#[test]
fn dall_e_rejects_imagen_quality_naming_valid_set() {
    let params = ImageParams {
        quality: ImageQuality::Ultra,
        ..ImageParams::for_model(ImageModel::DallE3)
    };
    let err = validate_image("a lighthouse", &params).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid quality setting for dall-e-3: ultra, supported options: standard, hd"
    );
}

#[test]
fn prompt_limits_count_characters_not_bytes() {
    assert_eq!(validate_prompt("   "), Err(ValidationError::EmptyPrompt));
    assert!(validate_prompt(&"貓".repeat(2000)).is_ok());
    assert_eq!(
        validate_prompt(&"a".repeat(2001)),
        Err(ValidationError::PromptTooLong {
            max: 2000,
            actual: 2001
        })
    );
}

#[test]
fn image_count_range_is_checked_before_model_counts() {
    let mut params = ImageParams::for_model(ImageModel::Imagen);
    params.count = 11;
    assert!(matches!(
        validate_image("fox", &params),
        Err(ValidationError::CountOutOfRange { count: 11, .. })
    ));

    params.count = 6;
    let err = validate_image("fox", &params).unwrap_err();
    assert!(err.to_string().contains("supported options: 1, 2, 3, 4"));

    params.count = 3;
    assert!(validate_image("fox", &params).is_ok());
}

#[test]
fn imagen_accepts_wide_sizes_it_does_not_offer() {
    let mut params = ImageParams::for_model(ImageModel::Imagen);
    params.size = ImageSize::new(1792, 1024);
    assert!(validate_image("fox", &params).is_ok());

    params.size = ImageSize::new(512, 512);
    let err = validate_image("fox", &params).unwrap_err();
    assert!(err.to_string().starts_with("Invalid size setting for imagen: 512x512"));
}

#[test]
fn switching_image_model_keeps_offered_values() {
    let mut params = ImageParams::for_model(ImageModel::DallE3);
    params.quality = ImageQuality::Hd;
    params.size = ImageSize::new(1024, 1792);

    params.switch_model(ImageModel::Imagen);
    assert_eq!(params.count, 4);
    assert_eq!(params.quality, ImageQuality::Standard);
    assert_eq!(params.size, ImageSize::new(1024, 1024));

    params.quality = ImageQuality::Standard;
    params.switch_model(ImageModel::DallE3);
    assert_eq!(params.count, 1);
    assert_eq!(params.quality, ImageQuality::Standard);
    assert!(image_options(params.model).supports_style);
}

#[test]
fn video_durations_outside_five_to_eight_are_rejected() {
    let mut params = VideoParams::for_model(VideoModel::OpenAi);
    params.duration = 9;
    params.switch_model(VideoModel::OpenAi);
    assert_eq!(params.duration, 9);

    let err = validate_video("waves", &params).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid duration setting for openai: 9, supported options: 5, 6, 7, 8"
    );

    params.switch_model(VideoModel::Veo);
    assert_eq!(params.duration, 5);
    assert!(validate_video("waves", &params).is_ok());
}

#[test]
fn every_aspect_ratio_is_accepted_by_every_video_model() {
    for model in VideoModel::ALL {
        for ratio in AspectRatio::ALL {
            let params = VideoParams {
                aspect_ratio: *ratio,
                ..VideoParams::for_model(*model)
            };
            assert_eq!(validate_video("waves at night", &params), Ok(()));
        }
    }
}
