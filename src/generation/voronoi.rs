//! Voronoi cell polygons from a Delaunay triangulation
//!
//! The generator only needs "give me each site's cell inside this rectangle".
//! That contract is the [`VoronoiProvider`] trait; the default implementation
//! triangulates with spade and cuts the rectangle down by the perpendicular
//! bisectors to each site's Delaunay neighbours.

use glam::DVec2;
use log::trace;
use spade::{DelaunayTriangulation, Point2, Triangulation};
use std::collections::HashMap;

use crate::geometry::{clip_polygon, HalfPlane, Rect, INSIDE_EPSILON};

/// Source of bounded Voronoi cell polygons
pub trait VoronoiProvider {
    /// One entry per site, in input order
    ///
    /// `None` marks a site that has no cell of its own: non-finite, outside
    /// `bounds`, or coincident with an earlier site. Polygons may repeat
    /// their first vertex at the end.
    fn cell_polygons(&self, sites: &[DVec2], bounds: Rect) -> Vec<Option<Vec<DVec2>>>;
}

/// Default provider backed by spade's Delaunay triangulation
#[derive(Debug, Clone, Copy, Default)]
pub struct DelaunayVoronoi;

impl VoronoiProvider for DelaunayVoronoi {
    fn cell_polygons(&self, sites: &[DVec2], bounds: Rect) -> Vec<Option<Vec<DVec2>>> {
        let mut triangulation: DelaunayTriangulation<Point2<f64>> = DelaunayTriangulation::new();
        // Triangulation vertex index -> first site inserted there
        let mut owner: HashMap<usize, usize> = HashMap::with_capacity(sites.len());
        let mut handles = vec![None; sites.len()];

        // Clamped sites may sit a hair outside the square
        let tolerance = DVec2::splat(INSIDE_EPSILON);
        let accepted = Rect::new(bounds.min - tolerance, bounds.max + tolerance);

        for (idx, site) in sites.iter().enumerate() {
            if !site.is_finite() || !accepted.contains(*site) {
                continue;
            }
            let Ok(handle) = triangulation.insert(Point2::new(site.x, site.y)) else {
                continue;
            };
            if owner.contains_key(&handle.index()) {
                trace!("[Voronoi] site {} coincides with an earlier site", idx);
                continue;
            }
            owner.insert(handle.index(), idx);
            handles[idx] = Some(handle);
        }

        let rect = bounds.polygon();
        handles
            .iter()
            .enumerate()
            .map(|(idx, handle)| {
                let handle = (*handle)?;
                let site = sites[idx];
                let bisectors: Vec<HalfPlane> = triangulation
                    .vertex(handle)
                    .out_edges()
                    .map(|edge| {
                        let neighbor = edge.to().position();
                        HalfPlane::bisector(site, DVec2::new(neighbor.x, neighbor.y))
                    })
                    .collect();
                clip_polygon(&rect, &bisectors)
            })
            .collect()
    }
}
