use coalign::{CoalignError, Datacube, Image, ImageView};

#[test]
fn image_view_rejects_invalid_dimensions() {
    let data = [0.0f64; 4];

    let err = ImageView::from_slice(&data, 0, 1).err().unwrap();
    assert_eq!(
        err,
        CoalignError::InvalidDimensions {
            width: 0,
            height: 1,
        }
    );

    let err = ImageView::from_slice(&data, 1, 0).err().unwrap();
    assert_eq!(
        err,
        CoalignError::InvalidDimensions {
            width: 1,
            height: 0,
        }
    );
}

#[test]
fn image_view_rejects_invalid_stride() {
    let data = [0.0f64; 8];

    let err = ImageView::new(&data, 4, 1, 3).err().unwrap();
    assert_eq!(
        err,
        CoalignError::InvalidStride {
            width: 4,
            stride: 3,
        }
    );
}

#[test]
fn image_view_rejects_small_buffer() {
    let data = [0.0f64; 3];

    let err = ImageView::new(&data, 2, 2, 2).err().unwrap();
    assert_eq!(err, CoalignError::BufferTooSmall { needed: 4, got: 3 });
}

#[test]
fn image_view_roi_matches_expected_values() {
    let data: Vec<f64> = (0..16).map(f64::from).collect();
    let view = ImageView::from_slice(&data, 4, 4).unwrap();
    assert_eq!(view.stride(), 4);
    assert_eq!(view.as_slice(), data.as_slice());

    let roi = view.roi(1, 1, 2, 2).unwrap();
    assert_eq!(roi.width(), 2);
    assert_eq!(roi.height(), 2);
    assert_eq!(roi.stride(), 4);
    assert_eq!(roi.row(0).unwrap(), &[5.0, 6.0]);
    assert_eq!(roi.row(1).unwrap(), &[9.0, 10.0]);
    assert_eq!(roi.get(0, 0).copied(), Some(5.0));
    assert!(roi.get(2, 0).is_none());
    assert_eq!(roi.argmax(), (1, 1));

    let err = view.roi(3, 3, 2, 2).err().unwrap();
    assert_eq!(
        err,
        CoalignError::RoiOutOfBounds {
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
fn image_converts_u8_samples() {
    let img = Image::from_u8(&[0, 128, 255, 7], 2, 2).unwrap();
    assert_eq!(img.data(), &[0.0, 128.0, 255.0, 7.0]);
    assert_eq!(img.get(1, 1), Some(7.0));
    assert!(img.get(2, 0).is_none());
}

#[test]
fn image_rejects_mismatched_buffer() {
    let err = Image::new(vec![0.0; 3], 2, 2).err().unwrap();
    assert_eq!(err, CoalignError::BufferTooSmall { needed: 4, got: 3 });
}

#[test]
fn datacube_layout_is_time_fastest() {
    let data: Vec<f64> = (0..2 * 3 * 4).map(f64::from).collect();
    let cube = Datacube::new(data, 2, 3, 4).unwrap();
    assert_eq!(cube.shape(), (2, 3, 4));
    assert_eq!(cube.get(0, 0, 3), Some(3.0));
    assert_eq!(cube.get(0, 1, 0), Some(4.0));
    assert_eq!(cube.get(1, 0, 0), Some(12.0));
    assert!(cube.get(2, 0, 0).is_none());

    let layer = cube.view().layer(1).unwrap();
    assert_eq!((layer.width(), layer.height()), (3, 2));
    assert_eq!(layer.data(), &[1.0, 5.0, 9.0, 13.0, 17.0, 21.0]);
}

#[test]
fn datacube_rejects_wrong_length() {
    assert!(Datacube::new(vec![0.0; 5], 1, 2, 3).is_err());
    assert!(Datacube::new(Vec::new(), 0, 2, 3).is_err());
}
