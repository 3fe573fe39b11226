use bandmatch::{BandMatchError, ImageView, OwnedImage, ScoreMap, Template, TemplatePlan};

#[test]
fn image_view_rejects_invalid_dimensions() {
    let data = [0u8; 4];

    let err = ImageView::from_slice(&data, 0, 1).err().unwrap();
    assert_eq!(
        err,
        BandMatchError::InvalidDimensions {
            width: 0,
            height: 1,
        }
    );

    let err = ImageView::from_slice(&data, 1, 0).err().unwrap();
    assert_eq!(
        err,
        BandMatchError::InvalidDimensions {
            width: 1,
            height: 0,
        }
    );
}

#[test]
fn image_view_rejects_invalid_stride_and_small_buffers() {
    let data = [0u8; 8];
    let err = ImageView::new(&data, 4, 1, 3).err().unwrap();
    assert_eq!(
        err,
        BandMatchError::InvalidStride {
            width: 4,
            stride: 3,
        }
    );

    let err = ImageView::new(&data[..3], 2, 2, 2).err().unwrap();
    assert_eq!(err, BandMatchError::BufferTooSmall { needed: 4, got: 3 });
}

#[test]
fn image_view_roi_matches_expected_values() {
    let data: Vec<u8> = (0u8..16).collect();
    let view = ImageView::from_slice(&data, 4, 4).unwrap();

    let roi = view.roi(1, 1, 2, 2).unwrap();
    assert_eq!(roi.stride(), 4);
    assert_eq!(roi.row(0).unwrap(), &[5u8, 6u8]);
    assert_eq!(roi.row(1).unwrap(), &[9u8, 10u8]);
    assert_eq!(roi.get(0, 0).copied(), Some(5u8));
    assert!(roi.get(2, 0).is_none());

    let err = view.roi(3, 3, 2, 2).err().unwrap();
    assert_eq!(
        err,
        BandMatchError::RoiOutOfBounds {
            x: 3,
            y: 3,
            width: 2,
            height: 2,
            img_width: 4,
            img_height: 4,
        }
    );
}

#[test]
fn owned_image_copies_strided_views() {
    let data: Vec<u8> = (0u8..12).collect();
    let view = ImageView::new(&data, 2, 3, 4).unwrap();
    let owned = OwnedImage::from_view(view).unwrap();
    assert_eq!(owned.data(), &[0u8, 1, 4, 5, 8, 9]);
    assert_eq!(owned.view().row(2).unwrap(), &[8u8, 9]);

    let err = OwnedImage::new(vec![0u8; 5], 2, 2).err().unwrap();
    assert_eq!(
        err,
        BandMatchError::InvalidDimensions {
            width: 2,
            height: 2
        }
    );
}

#[test]
fn template_plan_reports_template_geometry() {
    let tpl = Template::new(vec![0u8, 1, 2, 3, 4, 5], 3, 2).unwrap();
    let plan = TemplatePlan::from_view(tpl.view()).unwrap();
    assert_eq!((plan.width(), plan.height()), (3, 2));
    assert_eq!(plan.raw(), &[0.0f32, 1.0, 2.0, 3.0, 4.0, 5.0]);
    assert!((plan.mean() - 2.5).abs() < 1e-6);
}

#[test]
fn template_from_strided_view_copies_the_window() {
    let data: Vec<u8> = (0u8..16).collect();
    let view = ImageView::from_slice(&data, 4, 4).unwrap();
    let tpl = Template::from_view(view.roi(1, 2, 3, 2).unwrap()).unwrap();
    assert_eq!((tpl.width(), tpl.height()), (3, 2));
    assert_eq!(tpl.view().stride(), 3);
    assert_eq!(tpl.view().row(0).unwrap(), &[9u8, 10, 11]);
    assert_eq!(tpl.view().row(1).unwrap(), &[13u8, 14, 15]);
}

#[test]
fn score_map_rejects_wrong_buffer_length() {
    let err = ScoreMap::new(vec![0.0; 5], 3, 2).err().unwrap();
    assert_eq!(err, BandMatchError::BufferTooSmall { needed: 6, got: 5 });
    let map = ScoreMap::new(vec![1.0, 2.0, 3.0, 4.0], 2, 2).unwrap();
    assert_eq!(map.row(1).unwrap(), &[3.0f32, 4.0]);
    assert!(map.get(2, 0).is_none());
}
