//! Referenzlinie einer Straße: Catmull-Rom-Kurve durch die Kontrollpunkte.
//!
//! Die Kurve wird einmal dicht abgetastet; `point_at`/`tangent_at` arbeiten
//! auf der Bogenlänge, damit `u` proportional zu `s` ist.

use glam::Vec3;

/// Parametrisierte Kurve, auf der Straßen und (s, t)-Objekte liegen.
///
/// `u ∈ [0, 1]` ist der Anteil an der Gesamtlänge.
pub trait ReferenceLine {
    /// Punkt bei Anteil `u` der Bogenlänge.
    fn point_at(&self, u: f32) -> Vec3;
    /// Normierte Tangente bei Anteil `u`.
    fn tangent_at(&self, u: f32) -> Vec3;
    /// Gesamtlänge in Metern.
    fn length(&self) -> f32;

    /// Weltposition für eine (s, t)-Koordinate.
    ///
    /// Positives `t` liegt links der Fahrtrichtung (Rückrichtungs-Fahrstreifen),
    /// negatives `t` rechts (Vorwärts-Fahrstreifen).
    fn position_at_st(&self, s: f32, t: f32) -> Vec3 {
        let length = self.length();
        let u = if length > f32::EPSILON {
            (s / length).clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.point_at(u) + lateral_normal(self.tangent_at(u)) * t
    }
}

/// Linke Normale (in der XZ-Ebene) zu einer Tangente.
pub fn lateral_normal(tangent: Vec3) -> Vec3 {
    Vec3::Y.cross(tangent).normalize_or_zero()
}

/// Berechnet einen Punkt auf einem Catmull-Rom-Segment (t ∈ [0, 1]).
fn catmull_rom_point(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, t: f32) -> Vec3 {
    let t2 = t * t;
    let t3 = t2 * t;
    0.5 * ((2.0 * p1)
        + (-p0 + p2) * t
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
        + (-p0 + 3.0 * p1 - 3.0 * p2 + p3) * t3)
}

/// Dichte Punktliste entlang der Catmull-Rom-Kette durch `points`.
///
/// An den Rändern werden Phantom-Punkte gespiegelt, damit die Kurve durch den
/// ersten und letzten Kontrollpunkt läuft.
fn sample_chain(points: &[Vec3], samples_per_segment: usize) -> Vec<Vec3> {
    let samples_per_segment = samples_per_segment.max(1);
    if points.len() < 2 {
        return points.to_vec();
    }
    let n = points.len();
    let mut result = Vec::with_capacity((n - 1) * samples_per_segment + 1);

    for seg in 0..(n - 1) {
        let p0 = if seg == 0 {
            2.0 * points[0] - points[1]
        } else {
            points[seg - 1]
        };
        let p1 = points[seg];
        let p2 = points[seg + 1];
        let p3 = if seg + 2 < n {
            points[seg + 2]
        } else {
            2.0 * points[n - 1] - points[n - 2]
        };

        let steps = if seg == n - 2 {
            samples_per_segment + 1
        } else {
            samples_per_segment
        };
        for i in 0..steps {
            let t = i as f32 / samples_per_segment as f32;
            result.push(catmull_rom_point(p0, p1, p2, p3, t));
        }
    }
    result
}

/// Abgetastete Catmull-Rom-Referenzlinie mit kumulierter Bogenlänge.
#[derive(Debug, Clone)]
pub struct CatmullRomLine {
    samples: Vec<Vec3>,
    cumulative: Vec<f32>,
}

impl CatmullRomLine {
    /// Baut die Kurve aus den Kontrollpunkten.
    pub fn new(control_points: &[Vec3], samples_per_segment: usize) -> Self {
        let samples = sample_chain(control_points, samples_per_segment);
        let mut cumulative = Vec::with_capacity(samples.len());
        let mut acc = 0.0f32;
        for (i, p) in samples.iter().enumerate() {
            if i > 0 {
                acc += samples[i - 1].distance(*p);
            }
            cumulative.push(acc);
        }
        Self {
            samples,
            cumulative,
        }
    }

    /// Sucht das Polyline-Segment zur Bogenlänge `s` und den lokalen Anteil.
    fn locate(&self, u: f32) -> Option<(usize, f32)> {
        if self.samples.len() < 2 {
            return None;
        }
        let target = u.clamp(0.0, 1.0) * self.length();
        let idx = self
            .cumulative
            .partition_point(|&c| c <= target)
            .clamp(1, self.samples.len() - 1);
        let start = self.cumulative[idx - 1];
        let seg_len = self.cumulative[idx] - start;
        let local = if seg_len > f32::EPSILON {
            (target - start) / seg_len
        } else {
            0.0
        };
        Some((idx - 1, local))
    }
}

impl ReferenceLine for CatmullRomLine {
    fn point_at(&self, u: f32) -> Vec3 {
        match self.locate(u) {
            Some((i, local)) => self.samples[i].lerp(self.samples[i + 1], local),
            None => self.samples.first().copied().unwrap_or(Vec3::ZERO),
        }
    }

    fn tangent_at(&self, u: f32) -> Vec3 {
        match self.locate(u) {
            Some((i, _)) => (self.samples[i + 1] - self.samples[i]).normalize_or_zero(),
            None => Vec3::X,
        }
    }

    fn length(&self) -> f32 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }
}

/// Kontrollpunkte eines Kreisbogens in der XZ-Ebene.
///
/// Winkel in Radiant; `segments` Stützpunkte pro vollem Umlauf.
pub fn arc_control_points(
    center: Vec3,
    radius: f32,
    start_angle: f32,
    end_angle: f32,
    segments: usize,
) -> Vec<Vec3> {
    let sweep = end_angle - start_angle;
    let count = ((sweep.abs() / std::f32::consts::TAU) * segments as f32)
        .ceil()
        .max(2.0) as usize;
    (0..=count)
        .map(|i| {
            let angle = start_angle + sweep * i as f32 / count as f32;
            center + Vec3::new(angle.cos() * radius, 0.0, angle.sin() * radius)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn gerade_hat_exakte_laenge() {
        let line = CatmullRomLine::new(&[Vec3::ZERO, Vec3::new(100.0, 0.0, 0.0)], 20);
        assert_relative_eq!(line.length(), 100.0, epsilon = 1e-3);
        assert_relative_eq!(line.point_at(0.25).x, 25.0, epsilon = 1e-3);
    }

    #[test]
    fn st_position_links_und_rechts() {
        let line = CatmullRomLine::new(&[Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0)], 4);
        // Fahrtrichtung +X, linke Normale zeigt nach -Z
        let left = line.position_at_st(5.0, 2.0);
        let right = line.position_at_st(5.0, -2.0);
        assert_relative_eq!(left.x, 5.0, epsilon = 1e-4);
        assert_relative_eq!(left.z, -2.0, epsilon = 1e-4);
        assert_relative_eq!(right.z, 2.0, epsilon = 1e-4);
    }

    #[test]
    fn kurve_laeuft_durch_alle_kontrollpunkte() {
        let points = [
            Vec3::ZERO,
            Vec3::new(10.0, 0.0, 5.0),
            Vec3::new(20.0, 0.0, 0.0),
        ];
        let line = CatmullRomLine::new(&points, 10);
        assert_relative_eq!(line.point_at(0.0).x, 0.0, epsilon = 1e-4);
        assert_relative_eq!(line.point_at(1.0).x, 20.0, epsilon = 1e-4);
        assert!(line.length() > 20.0);
    }

    #[test]
    fn einzelner_punkt_hat_laenge_null() {
        let line = CatmullRomLine::new(&[Vec3::ONE], 10);
        assert_eq!(line.length(), 0.0);
        assert_eq!(line.point_at(0.5), Vec3::ONE);
    }

    #[test]
    fn kreisbogen_liegt_auf_radius() {
        let points = arc_control_points(Vec3::ZERO, 10.0, 0.0, std::f32::consts::PI, 16);
        assert!(points.len() >= 3);
        for p in points {
            assert_relative_eq!(p.length(), 10.0, epsilon = 1e-4);
        }
    }
}
