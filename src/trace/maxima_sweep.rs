//! Maximal points by a right-to-left sweep
//!
//! Points are visited in descending x. Points whose x values agree within
//! [`EPS`] form one group; inside a group only the group's highest y can
//! survive. Across groups, `right_max_y` (the highest y among strictly larger
//! x) eliminates every point with `y <= right_max_y`. The running maximum is
//! updated after a whole group has been checked, never mid-group.

use super::{EventKind, NodeId, Registry, Trace, TraceBuilder};
use crate::primitives::geometry::{cmp_by_x_desc, Point, PointId, EPS};
use rustc_hash::FxHashMap;
use std::fmt;

/// Points sharing one sweep position, highest y first
#[derive(Debug, Clone)]
pub struct Group {
    pub x: f64,
    pub points: Vec<PointId>,
    pub max_y: f64,
    pub max_ids: Vec<PointId>,
}

/// Why a point was dominated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// A higher point shares its x
    SameX,
    /// `right_max_y` is at least its y
    Right,
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropReason::SameX => write!(f, "same-x"),
            DropReason::Right => write!(f, "right"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SweepEvent {
    EnterGroup {
        group: NodeId,
        x: f64,
        points: Vec<PointId>,
        right_max_y: Option<f64>,
        witness: Option<PointId>,
    },
    CheckPoint {
        group: NodeId,
        point: PointId,
        reason: Option<DropReason>,
        witness: Option<PointId>,
        right_max_y: Option<f64>,
    },
    DropPoint {
        group: NodeId,
        point: PointId,
        witness: Option<PointId>,
        reason: DropReason,
    },
    KeepPoint {
        group: NodeId,
        point: PointId,
    },
    GroupDone {
        group: NodeId,
        x: f64,
        right_max_y: Option<f64>,
        witness: Option<PointId>,
    },
}

impl SweepEvent {
    pub fn group(&self) -> NodeId {
        match self {
            SweepEvent::EnterGroup { group, .. }
            | SweepEvent::CheckPoint { group, .. }
            | SweepEvent::DropPoint { group, .. }
            | SweepEvent::KeepPoint { group, .. }
            | SweepEvent::GroupDone { group, .. } => *group,
        }
    }
}

impl EventKind for SweepEvent {
    fn kind(&self) -> &'static str {
        match self {
            SweepEvent::EnterGroup { .. } => "enter-group",
            SweepEvent::CheckPoint { .. } => "check-point",
            SweepEvent::DropPoint { .. } => "drop-point",
            SweepEvent::KeepPoint { .. } => "keep-point",
            SweepEvent::GroupDone { .. } => "group-done",
        }
    }
}

/// Group points (already in descending-x order) by near-equal x
pub fn build_groups(desc: &[Point]) -> Vec<Group> {
    let mut groups: Vec<(f64, Vec<Point>)> = Vec::new();
    for p in desc {
        match groups.last_mut() {
            Some((x, members)) if (*x - p.x).abs() <= EPS => members.push(*p),
            _ => groups.push((p.x, vec![*p])),
        }
    }

    groups
        .into_iter()
        .map(|(x, mut members)| {
            members.sort_by(|a, b| b.y.total_cmp(&a.y).then_with(|| a.id.cmp(&b.id)));
            let max_y = members
                .iter()
                .map(|p| p.y)
                .fold(f64::NEG_INFINITY, f64::max);
            let max_ids = members
                .iter()
                .filter(|p| (p.y - max_y).abs() <= EPS)
                .map(|p| p.id)
                .collect();
            Group {
                x,
                points: members.iter().map(|p| p.id).collect(),
                max_y,
                max_ids,
            }
        })
        .collect()
}

#[derive(Debug, Default)]
pub struct MaximaSweepBuilder;

impl TraceBuilder for MaximaSweepBuilder {
    type Input = Vec<Point>;
    type Event = SweepEvent;
    type Node = Group;

    fn build(&mut self, input: &Vec<Point>) -> Trace<SweepEvent, Group> {
        let by_id: FxHashMap<PointId, Point> = input.iter().map(|p| (p.id, *p)).collect();
        let mut desc = input.clone();
        desc.sort_by(cmp_by_x_desc);

        let mut nodes = Registry::new();
        let mut events = Vec::new();
        let mut right_max: Option<(f64, Option<PointId>)> = None;

        for group in build_groups(&desc) {
            let gid = nodes.insert(None, group.clone());
            events.push(SweepEvent::EnterGroup {
                group: gid,
                x: group.x,
                points: group.points.clone(),
                right_max_y: right_max.map(|(y, _)| y),
                witness: right_max.and_then(|(_, w)| w),
            });

            for &pid in &group.points {
                let Some(p) = by_id.get(&pid) else {
                    continue;
                };
                let same_x = p.y < group.max_y - EPS;
                let by_right = right_max.is_some_and(|(y, _)| y >= p.y - EPS);
                let (reason, witness) = if same_x {
                    (Some(DropReason::SameX), group.max_ids.first().copied())
                } else if by_right {
                    (Some(DropReason::Right), right_max.and_then(|(_, w)| w))
                } else {
                    (None, None)
                };

                events.push(SweepEvent::CheckPoint {
                    group: gid,
                    point: pid,
                    reason,
                    witness,
                    right_max_y: right_max.map(|(y, _)| y),
                });
                events.push(match reason {
                    Some(reason) => SweepEvent::DropPoint {
                        group: gid,
                        point: pid,
                        witness,
                        reason,
                    },
                    None => SweepEvent::KeepPoint {
                        group: gid,
                        point: pid,
                    },
                });
            }

            right_max = match right_max {
                Some((y, w)) if group.max_y <= y + EPS => Some((y, w)),
                Some((_, w)) => Some((group.max_y, group.max_ids.first().copied().or(w))),
                None => Some((group.max_y, group.max_ids.first().copied())),
            };

            events.push(SweepEvent::GroupDone {
                group: gid,
                x: group.x,
                right_max_y: right_max.map(|(y, _)| y),
                witness: right_max.and_then(|(_, w)| w),
            });
        }

        tracing::debug!(
            events = events.len(),
            groups = nodes.len(),
            "maxima sweep trace built"
        );
        Trace::new(events, nodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::geometry::brute_force_maxima;

    fn pts(coords: &[(f64, f64)]) -> Vec<Point> {
        coords
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| Point::new(i, x, y))
            .collect()
    }

    fn kept(trace: &Trace<SweepEvent, Group>) -> Vec<PointId> {
        let mut ids: Vec<_> = trace
            .events()
            .iter()
            .filter_map(|e| match e {
                SweepEvent::KeepPoint { point, .. } => Some(*point),
                _ => None,
            })
            .collect();
        ids.sort_unstable();
        ids
    }

    #[test]
    fn test_groups_share_near_equal_x() {
        let desc = vec![
            Point::new(0, 5.0, 1.0),
            Point::new(1, 5.0 + 1e-12, 3.0),
            Point::new(2, 4.0, 2.0),
        ];
        let groups = build_groups(&desc);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].points, vec![1, 0]);
        assert_eq!(groups[0].max_ids, vec![1]);
    }

    #[test]
    fn test_same_x_lower_point_is_dropped() {
        let trace = MaximaSweepBuilder.build(&pts(&[(5.0, 1.0), (5.0, 3.0)]));
        let reasons: Vec<_> = trace
            .events()
            .iter()
            .filter_map(|e| match e {
                SweepEvent::DropPoint { point, reason, .. } => Some((*point, *reason)),
                _ => None,
            })
            .collect();
        assert_eq!(reasons, vec![(0, DropReason::SameX)]);
        assert_eq!(kept(&trace), vec![1]);
    }

    #[test]
    fn test_equal_y_to_the_left_is_dominated() {
        let trace = MaximaSweepBuilder.build(&pts(&[(1.0, 4.0), (3.0, 4.0)]));
        assert_eq!(kept(&trace), vec![1]);
    }

    #[test]
    fn test_running_max_updates_after_group() {
        let trace = MaximaSweepBuilder.build(&pts(&[(2.0, 5.0), (9.0, 1.0)]));
        match &trace.events()[0] {
            SweepEvent::EnterGroup { right_max_y, .. } => assert_eq!(*right_max_y, None),
            other => panic!("Expected enter-group, got {:?}", other),
        }
        match trace.events().last() {
            Some(SweepEvent::GroupDone {
                right_max_y,
                witness,
                ..
            }) => {
                assert_eq!(*right_max_y, Some(5.0));
                assert_eq!(*witness, Some(0));
            }
            other => panic!("Expected group-done, got {:?}", other),
        }
    }

    #[test]
    fn test_matches_brute_force() {
        let points = pts(&[
            (10.0, 20.0),
            (18.0, 46.0),
            (26.0, 28.0),
            (34.0, 62.0),
            (45.0, 40.0),
            (56.0, 72.0),
            (64.0, 55.0),
            (64.0, 67.0),
            (74.0, 79.0),
            (82.0, 63.0),
            (90.0, 88.0),
            (90.0, 71.0),
        ]);
        let trace = MaximaSweepBuilder.build(&points);
        assert_eq!(kept(&trace), brute_force_maxima(&points));
    }
}
