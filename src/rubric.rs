/// One entry of the fixed observation rubric.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Indicator {
    pub id: &'static str,
    pub area: &'static str,
    pub title: &'static str,
    pub explanation: &'static str,
    /// Prewritten comment attached by the quick-comment button.
    pub auto_comment: &'static str,
}

/// The 18 teaching indicators observers annotate against.
pub const INDICATORS: [Indicator; 18] = [
    Indicator {
        id: "1.1",
        area: "Learning environment",
        title: "Organized teaching area",
        explanation: "Teaching area is highly organized; materials, props, and technology are easily accessible. Students can see the teaching materials well.",
        auto_comment: "Classroom is exceptionally well-organized with clear learning zones",
    },
    Indicator {
        id: "1.2",
        area: "Learning environment",
        title: "Safe teaching environment",
        explanation: "Teaching environment is completely safe for all activities. Classroom space is effectively organized for easy movement during activities and transitions.",
        auto_comment: "Classroom environment is completely safe for all activities",
    },
    Indicator {
        id: "1.3",
        area: "Learning environment",
        title: "Visually stimulating environment",
        explanation: "Classroom visuals fully reinforce lesson content and engage students.",
        auto_comment: "Visual displays perfectly reinforce current learning objectives",
    },
    Indicator {
        id: "2.1",
        area: "Classroom management",
        title: "Established classroom routines",
        explanation: "Classroom routines are well-established and consistently followed.",
        auto_comment: "Classroom routines are well-established and consistently followed",
    },
    Indicator {
        id: "2.2",
        area: "Classroom management",
        title: "Positive classroom management",
        explanation: "Maintains positive classroom environment with clear expectations.",
        auto_comment: "Excellent classroom management creates positive learning environment",
    },
    Indicator {
        id: "2.3",
        area: "Classroom management",
        title: "Technical troubleshooting",
        explanation: "Proactively resolves technical issues without disrupting lesson flow.",
        auto_comment: "Proactively resolves technical issues without disrupting lesson flow",
    },
    Indicator {
        id: "3.1",
        area: "Lesson delivery",
        title: "Follows lesson plan",
        explanation: "Lesson plans are followed with precision and clear purpose.",
        auto_comment: "Lesson plans are followed with precision and clear purpose",
    },
    Indicator {
        id: "3.2",
        area: "Lesson delivery",
        title: "Memory mode delivery",
        explanation: "Memory mode is used effectively to enhance student engagement.",
        auto_comment: "Memory mode is used effectively to enhance student engagement",
    },
    Indicator {
        id: "3.3",
        area: "Lesson delivery",
        title: "Material usage",
        explanation: "Curriculum materials are used effectively as outlined in the manuals.",
        auto_comment: "Curriculum materials are used effectively as outlined in the manuals",
    },
    Indicator {
        id: "3.4",
        area: "Lesson delivery",
        title: "Student progress monitoring",
        explanation: "Effectively monitors student progress and understanding.",
        auto_comment: "Excellent monitoring of student progress and understanding",
    },
    Indicator {
        id: "3.5",
        area: "Lesson delivery",
        title: "Teaching adjustments",
        explanation: "Teaching is effectively adjusted based on student responses.",
        auto_comment: "Teaching is effectively adjusted based on student responses",
    },
    Indicator {
        id: "4.1",
        area: "Questioning techniques",
        title: "Purposeful questioning",
        explanation: "Questions are purposeful and aligned with learning objectives.",
        auto_comment: "Questions are purposeful and aligned with learning objectives",
    },
    Indicator {
        id: "4.2",
        area: "Questioning techniques",
        title: "Student engagement",
        explanation: "Questions engage all students and promote critical thinking.",
        auto_comment: "Questions engage all students and promote critical thinking",
    },
    Indicator {
        id: "5.1",
        area: "Transition management",
        title: "Smooth transitions",
        explanation: "Transitions are smooth and maintain lesson momentum.",
        auto_comment: "Transitions are smooth and maintain lesson momentum",
    },
    Indicator {
        id: "6.1",
        area: "Teacher presence",
        title: "Gestures and expressions",
        explanation: "Uses gestures and expressions effectively to engage students.",
        auto_comment: "Excellent use of gestures and expressions to engage students",
    },
    Indicator {
        id: "6.2",
        area: "Teacher presence",
        title: "Wait time",
        explanation: "Provides appropriate wait time for student responses.",
        auto_comment: "Provides appropriate wait time for student responses",
    },
    Indicator {
        id: "7.1",
        area: "Student interaction",
        title: "Peer practice facilitation",
        explanation: "Effectively facilitates peer practice and collaboration.",
        auto_comment: "Effectively facilitates peer practice and collaboration",
    },
    Indicator {
        id: "8.1",
        area: "Instructional delivery",
        title: "Modeling actions",
        explanation: "Accurately models actions and movements that align with lesson content, enhancing comprehension and engagement.",
        auto_comment: "Actions and movements are perfectly aligned with lesson content",
    },
];

/// Look an indicator up by id.
pub fn find(id: &str) -> Option<&'static Indicator> {
    INDICATORS.iter().find(|indicator| indicator.id == id)
}

/// Distinct rubric areas, in rubric order.
pub fn areas() -> Vec<&'static str> {
    let mut areas = Vec::new();
    for indicator in &INDICATORS {
        if !areas.contains(&indicator.area) {
            areas.push(indicator.area);
        }
    }
    areas
}

/// Indicators belonging to one area, in rubric order.
pub fn in_area(area: &str) -> impl Iterator<Item = &'static Indicator> + '_ {
    INDICATORS.iter().filter(move |indicator| indicator.area == area)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_id() {
        assert_eq!(find("3.2").unwrap().title, "Memory mode delivery");
        assert!(find("9.9").is_none());
    }

    #[test]
    fn every_indicator_belongs_to_an_area_group() {
        let total: usize = areas().iter().map(|area| in_area(area).count()).sum();
        assert_eq!(total, INDICATORS.len());
    }
}
