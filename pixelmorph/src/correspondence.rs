use crate::pixel_features::PixelFeature;
use tracing::debug;

/// Fraction of each pixel list treated as the structurally important "edge set".
const EDGE_QUANTILE: f32 = 0.25;

/// A matched source→target pixel pair.
///
/// The color is taken entirely from the source pixel; the animation moves it
/// from the source position to the matched target position. `current_x` and
/// `current_y` are recomputed from scratch every frame as a function of the
/// endpoints and the eased progress, never advanced incrementally, so replaying
/// a frame at the same progress is idempotent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    /// Red channel of the source pixel.
    pub r: u8,
    /// Green channel of the source pixel.
    pub g: u8,
    /// Blue channel of the source pixel.
    pub b: u8,
    /// Source pixel column.
    pub start_x: u32,
    /// Source pixel row.
    pub start_y: u32,
    /// Matched target pixel column.
    pub end_x: u32,
    /// Matched target pixel row.
    pub end_y: u32,
    /// Interpolated column for the current frame.
    pub current_x: i32,
    /// Interpolated row for the current frame.
    pub current_y: i32,
}

impl Particle {
    fn between(source: &PixelFeature, target: &PixelFeature) -> Particle {
        Particle {
            r: source.r,
            g: source.g,
            b: source.b,
            start_x: source.x,
            start_y: source.y,
            end_x: target.x,
            end_y: target.y,
            current_x: source.x as i32,
            current_y: source.y as i32,
        }
    }
}

/// Builds a deterministic particle list from two pixel-feature lists using
/// Edge Prioritization.
///
/// # How It Works
/// 1. **Partition**: Each list is stable-sorted by descending edge strength
///    (ties keep row-major order) and split at `floor(n * 0.25)`: the strongest
///    quarter becomes the edge set, the rest the body set.
/// 2. **Order**: All four sets are stable-sorted ascending by brightness, the
///    actual matching key.
/// 3. **Pair**: Edge pixels pair positionally with edge pixels, then body with
///    body; `min` truncation silently drops the longer set's surplus.
///
/// Matching within brightness-sorted partitions approximates an assignment that
/// preserves tonal structure without an optimal bipartite matching, while the
/// edge/body split keeps high-contrast silhouettes matched to each other.
///
/// Mismatched list lengths or image dimensions are not errors: the result just
/// contains fewer particles. Two empty lists produce an empty result.
pub fn build_particles(source: &[PixelFeature], target: &[PixelFeature]) -> Vec<Particle> {
    let (source_edges, source_body) = split_by_edge_strength(source);
    let (target_edges, target_body) = split_by_edge_strength(target);

    let edge_count = source_edges.len().min(target_edges.len());
    let body_count = source_body.len().min(target_body.len());

    let mut particles = Vec::with_capacity(edge_count + body_count);
    for i in 0..edge_count {
        particles.push(Particle::between(&source_edges[i], &target_edges[i]));
    }
    for i in 0..body_count {
        particles.push(Particle::between(&source_body[i], &target_body[i]));
    }

    debug!(
        edge_count,
        body_count,
        total = particles.len(),
        "built particle mapping"
    );
    particles
}

/// Splits `pixels` into the top-quantile edge set and the remaining body set,
/// both sorted ascending by brightness for positional matching.
fn split_by_edge_strength(pixels: &[PixelFeature]) -> (Vec<PixelFeature>, Vec<PixelFeature>) {
    let mut by_edge: Vec<PixelFeature> = pixels.to_vec();
    // sort_by is stable: equal edge strengths keep their row-major order.
    by_edge.sort_by(|a, b| b.edge_strength.total_cmp(&a.edge_strength));

    let split_index = (pixels.len() as f32 * EDGE_QUANTILE).floor() as usize;
    let mut edges = by_edge;
    let mut body = edges.split_off(split_index);

    edges.sort_by(|a, b| a.brightness.total_cmp(&b.brightness));
    body.sort_by(|a, b| a.brightness.total_cmp(&b.brightness));
    (edges, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn feature(x: u32, y: u32, brightness: f32, edge_strength: f32) -> PixelFeature {
        PixelFeature {
            r: brightness as u8,
            g: brightness as u8,
            b: brightness as u8,
            x,
            y,
            brightness,
            edge_strength,
        }
    }

    fn grid(values: &[(f32, f32)], width: u32) -> Vec<PixelFeature> {
        values
            .iter()
            .enumerate()
            .map(|(i, &(brightness, edge))| {
                feature(i as u32 % width, i as u32 / width, brightness, edge)
            })
            .collect()
    }

    #[test]
    fn identical_lists_map_every_pixel_onto_itself() {
        let pixels = grid(
            &[(10.0, 4.0), (50.0, 0.0), (20.0, 9.0), (80.0, 1.0)],
            2,
        );
        let particles = build_particles(&pixels, &pixels);
        assert_eq!(particles.len(), 4);
        for p in &particles {
            assert_eq!((p.start_x, p.start_y), (p.end_x, p.end_y));
        }
    }

    #[test]
    fn edge_set_is_floor_quarter_of_the_list() {
        // 8 pixels: two strongest edges form the edge set.
        let pixels = grid(
            &[
                (0.0, 1.0),
                (1.0, 8.0),
                (2.0, 0.0),
                (3.0, 0.0),
                (4.0, 9.0),
                (5.0, 0.0),
                (6.0, 0.0),
                (7.0, 0.0),
            ],
            4,
        );
        let (edges, body) = split_by_edge_strength(&pixels);
        assert_eq!(edges.len(), 2);
        assert_eq!(body.len(), 6);
        let edge_strengths: Vec<f32> = edges.iter().map(|f| f.edge_strength).collect();
        assert!(edge_strengths.contains(&8.0) && edge_strengths.contains(&9.0));
        // Within each set the matching order is by brightness.
        assert!(edges[0].brightness < edges[1].brightness);
        assert!(body.windows(2).all(|w| w[0].brightness <= w[1].brightness));
    }

    #[test]
    fn equal_edge_strengths_keep_row_major_order() {
        // All edge strengths zero: the "edge set" is the first quarter in
        // original order, and brightness ties also resolve by original order.
        let pixels = grid(&[(5.0, 0.0); 8], 4);
        let (edges, body) = split_by_edge_strength(&pixels);
        let edge_coords: Vec<(u32, u32)> = edges.iter().map(|f| (f.x, f.y)).collect();
        assert_eq!(edge_coords, vec![(0, 0), (1, 0)]);
        let body_coords: Vec<(u32, u32)> = body.iter().map(|f| (f.x, f.y)).collect();
        assert_eq!(
            body_coords,
            vec![(2, 0), (3, 0), (0, 1), (1, 1), (2, 1), (3, 1)]
        );
    }

    #[test]
    fn particle_color_comes_from_the_source() {
        let source = vec![PixelFeature {
            r: 200,
            g: 10,
            b: 30,
            x: 0,
            y: 0,
            brightness: 70.0,
            edge_strength: 0.0,
        }];
        let target = vec![PixelFeature {
            r: 1,
            g: 2,
            b: 3,
            x: 5,
            y: 6,
            brightness: 2.0,
            edge_strength: 0.0,
        }];
        let particles = build_particles(&source, &target);
        assert_eq!(particles.len(), 1);
        let p = particles[0];
        assert_eq!((p.r, p.g, p.b), (200, 10, 30));
        assert_eq!((p.start_x, p.start_y), (0, 0));
        assert_eq!((p.end_x, p.end_y), (5, 6));
        assert_eq!((p.current_x, p.current_y), (0, 0), "current starts at start");
    }

    #[test]
    fn mismatched_sizes_truncate_instead_of_failing() {
        let source = grid(&[(1.0, 0.0), (2.0, 0.0), (3.0, 0.0), (4.0, 0.0)], 2);
        let target = grid(&[(1.0, 0.0), (2.0, 0.0)], 2);
        let particles = build_particles(&source, &target);
        assert!(particles.len() <= 2);
        assert!(!particles.is_empty());
    }

    #[test]
    fn empty_inputs_produce_no_particles() {
        assert!(build_particles(&[], &[]).is_empty());
        let one = grid(&[(1.0, 0.0)], 1);
        assert!(build_particles(&one, &[]).is_empty());
        assert!(build_particles(&[], &one).is_empty());
    }

    proptest! {
        #[test]
        fn particle_count_never_exceeds_min_of_inputs(
            source_values in proptest::collection::vec((0.0f32..255.0, 0.0f32..100.0), 0..40),
            target_values in proptest::collection::vec((0.0f32..255.0, 0.0f32..100.0), 0..40),
        ) {
            let source = grid(&source_values, 8);
            let target = grid(&target_values, 8);
            let particles = build_particles(&source, &target);
            prop_assert!(particles.len() <= source.len().min(target.len()));

            // Edge + body counts reach the min bound exactly when the quantile
            // splits agree in size.
            let source_split = (source.len() as f32 * 0.25).floor() as usize;
            let target_split = (target.len() as f32 * 0.25).floor() as usize;
            if source.len() == target.len() {
                prop_assert_eq!(particles.len(), source.len().min(target.len()));
            } else {
                let expected = source_split.min(target_split)
                    + (source.len() - source_split).min(target.len() - target_split);
                prop_assert_eq!(particles.len(), expected);
            }
        }
    }
}
