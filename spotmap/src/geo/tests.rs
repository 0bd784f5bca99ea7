use super::*;

#[test]
fn test_valid_point() {
    let p = GeoPoint::new(6.5244, 3.3792).unwrap();
    assert_eq!(p.lat(), 6.5244);
    assert_eq!(p.lon(), 3.3792);
}

#[test]
fn test_latitude_out_of_range() {
    assert_eq!(
        GeoPoint::new(90.01, 0.0),
        Err(GeoError::InvalidLatitude(90.01))
    );
    assert_eq!(
        GeoPoint::new(-91.0, 0.0),
        Err(GeoError::InvalidLatitude(-91.0))
    );
}

#[test]
fn test_longitude_out_of_range() {
    assert_eq!(
        GeoPoint::new(0.0, 180.5),
        Err(GeoError::InvalidLongitude(180.5))
    );
}

#[test]
fn test_non_finite_rejected() {
    assert!(GeoPoint::new(f64::NAN, 0.0).is_err());
    assert!(GeoPoint::new(0.0, f64::INFINITY).is_err());
}

#[test]
fn test_boundary_values_accepted() {
    assert!(GeoPoint::new(MIN_LAT, MIN_LON).is_ok());
    assert!(GeoPoint::new(MAX_LAT, MAX_LON).is_ok());
}

#[test]
fn test_bounds_from_point_is_degenerate() {
    let p = GeoPoint::new(6.5, 3.3).unwrap();
    let b = GeoBounds::from_point(p);
    assert_eq!(b.min_lat, b.max_lat);
    assert_eq!(b.min_lon, b.max_lon);
    assert!(b.contains(p));
}

#[test]
fn test_bounds_extend() {
    let mut b = GeoBounds::from_point(GeoPoint::new(6.5244, 3.3792).unwrap());
    b.extend(GeoPoint::new(6.5355, 3.3516).unwrap());

    assert_eq!(b.min_lat, 6.5244);
    assert_eq!(b.max_lat, 6.5355);
    assert_eq!(b.min_lon, 3.3516);
    assert_eq!(b.max_lon, 3.3792);
}

#[test]
fn test_bounds_covering_empty_is_none() {
    assert_eq!(GeoBounds::covering(std::iter::empty()), None);
}

#[test]
fn test_bounds_covering_all_points() {
    let points = [
        GeoPoint::new(6.5244, 3.3792).unwrap(),
        GeoPoint::new(6.5355, 3.3516).unwrap(),
        GeoPoint::new(6.4474, 3.3903).unwrap(),
    ];
    let b = GeoBounds::covering(points).unwrap();
    for p in points {
        assert!(b.contains(p));
    }
}

#[test]
fn test_bounds_center() {
    let mut b = GeoBounds::from_point(GeoPoint::new(0.0, 0.0).unwrap());
    b.extend(GeoPoint::new(10.0, 20.0).unwrap());

    let c = b.center();
    assert_eq!(c.lat(), 5.0);
    assert_eq!(c.lon(), 10.0);
}

#[test]
fn test_point_serde_round_trip() {
    let p = GeoPoint::new(6.5244, 3.3792).unwrap();
    let json = serde_json::to_string(&p).unwrap();
    let back: GeoPoint = serde_json::from_str(&json).unwrap();
    assert_eq!(p, back);
}

#[test]
fn test_point_serde_rejects_invalid() {
    let result: Result<GeoPoint, _> = serde_json::from_str(r#"{"lat":99.0,"lon":0.0}"#);
    assert!(result.is_err());
}
