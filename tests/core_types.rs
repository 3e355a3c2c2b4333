use spotmark::{Frame, ImageView, OwnedImage, SpotmarkError, Template, TemplatePlan};
use std::time::Instant;

#[test]
fn image_view_rejects_invalid_dimensions() {
    let data = [0u8; 4];

    let err = ImageView::from_slice(&data, 0, 1).err().unwrap();
    assert_eq!(
        err,
        SpotmarkError::InvalidDimensions {
            width: 0,
            height: 1,
        }
    );

    let err = ImageView::from_slice(&data, 1, 0).err().unwrap();
    assert_eq!(
        err,
        SpotmarkError::InvalidDimensions {
            width: 1,
            height: 0,
        }
    );
}

#[test]
fn image_view_rejects_invalid_stride() {
    let data = [0u8; 8];

    let err = ImageView::new(&data, 4, 1, 3).err().unwrap();
    assert_eq!(
        err,
        SpotmarkError::InvalidStride {
            width: 4,
            stride: 3,
        }
    );
}

#[test]
fn image_view_rejects_small_buffer() {
    let data = [0u8; 3];

    let err = ImageView::new(&data, 2, 2, 2).err().unwrap();
    assert_eq!(err, SpotmarkError::BufferTooSmall { needed: 4, got: 3 });
}

#[test]
fn image_view_indexes_strided_rows() {
    let data: Vec<u8> = (0u8..12).collect();
    let view = ImageView::new(&data, 3, 3, 4).unwrap();

    assert_eq!(view.width(), 3);
    assert_eq!(view.height(), 3);
    assert_eq!(view.stride(), 4);
    assert_eq!(view.as_slice(), data.as_slice());
    assert_eq!(view.row(1).unwrap(), &[4u8, 5, 6]);
    assert_eq!(view.get(2, 2), Some(10u8));
    assert!(view.get(3, 0).is_none());
    assert!(view.row(3).is_none());
}

#[test]
fn owned_image_requires_exact_buffer_length() {
    let err = OwnedImage::new(vec![0u8; 5], 2, 2).err().unwrap();
    assert_eq!(
        err,
        SpotmarkError::InvalidDimensions {
            width: 2,
            height: 2,
        }
    );

    let err = OwnedImage::new(vec![0u8; 3], 2, 2).err().unwrap();
    assert_eq!(err, SpotmarkError::BufferTooSmall { needed: 4, got: 3 });
}

#[test]
fn owned_image_copies_strided_view_contiguously() {
    let data: Vec<u8> = (0u8..12).collect();
    let view = ImageView::new(&data, 3, 3, 4).unwrap();

    let owned = OwnedImage::from_view(view).unwrap();
    assert_eq!(owned.width(), 3);
    assert_eq!(owned.height(), 3);
    assert_eq!(owned.data(), &[0u8, 1, 2, 4, 5, 6, 8, 9, 10]);
    assert_eq!(owned.view().stride(), 3);
}

#[test]
fn frame_exposes_dimensions_and_timestamp() {
    let captured_at = Instant::now();
    let frame = Frame::new(vec![0u8; 6], 3, 2, captured_at).unwrap();

    assert_eq!(frame.width(), 3);
    assert_eq!(frame.height(), 2);
    assert_eq!(frame.captured_at(), captured_at);
    assert_eq!(frame.view().row(1).unwrap(), &[0u8, 0, 0]);
}

#[test]
fn template_keeps_caller_assigned_id() {
    let template = Template::new(7, vec![0u8, 1, 2, 3], 2, 2).unwrap();
    assert_eq!(template.id(), 7);
    assert_eq!(template.width(), 2);
    assert_eq!(template.height(), 2);
}

#[test]
fn template_plan_matches_known_stats() {
    let template = Template::new(0, vec![0u8, 1, 2, 3], 2, 2).unwrap();
    let plan = TemplatePlan::from_view(template.view()).unwrap();

    // mean 1.5, per-pixel variance 1.25, so var_t = 4 * 1.25.
    assert_eq!(plan.width(), 2);
    assert_eq!(plan.height(), 2);
    assert!((plan.var_t() - 5.0).abs() < 1e-6);

    let expected_t_prime = [-1.5f32, -0.5, 0.5, 1.5];
    for (value, expected) in plan.t_prime().iter().zip(expected_t_prime.iter()) {
        assert!((value - expected).abs() < 1e-6);
    }
}

#[test]
fn template_plan_rejects_degenerate_templates() {
    let template = Template::new(0, vec![5u8; 4], 2, 2).unwrap();
    let err = TemplatePlan::from_view(template.view()).err().unwrap();
    assert_eq!(
        err,
        SpotmarkError::DegenerateTemplate {
            reason: "zero variance",
        }
    );
}
