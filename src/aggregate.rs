#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Pure reconstruction of nested records from flat rows.
//!
//! Nothing here performs I/O; the facade fetches rows and hands them over.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::{
    error::{ClientError, Result},
    models::{Assignment, AutograderClass, Enrollment, Profile, StoredObject, Submission, SubmissionVersion},
};

/// A row that names one submitted file.
pub trait SubmittedFile {
    /// The submitted file name, verbatim.
    fn submitted_name(&self) -> &str;
}

impl SubmittedFile for Submission {
    fn submitted_name(&self) -> &str {
        &self.file_name
    }
}

impl SubmittedFile for StoredObject {
    fn submitted_name(&self) -> &str {
        &self.name
    }
}

impl<F: SubmittedFile + ?Sized> SubmittedFile for &F {
    fn submitted_name(&self) -> &str {
        (**self).submitted_name()
    }
}

/// Folds enrollment rows into one profile per profile id.
///
/// Profiles come out in order of first appearance. Each profile's classes are
/// the classes of its rows, in row order; every profile owns its own vector.
pub fn enrollments_to_profiles<I>(enrollments: I) -> Vec<Profile>
where
    I: IntoIterator<Item = Enrollment>,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut profiles: Vec<Profile> = Vec::new();

    for Enrollment { class, profile, .. } in enrollments {
        let slot = match index.get(&profile.id) {
            Some(&slot) => slot,
            None => {
                let slot = profiles.len();
                index.insert(profile.id.clone(), slot);
                profiles.push(Profile {
                    classes: Some(Vec::new()),
                    ..profile
                });
                slot
            }
        };

        profiles[slot]
            .classes
            .get_or_insert_with(Vec::new)
            .push(class);
    }

    profiles
}

/// Whether every required file name appears among the submitted names.
///
/// Exact, case-sensitive comparison. Extra files and repeated versions of a
/// file do not matter; an empty requirement list is always satisfied.
pub fn is_complete_submission<I, S>(submitted: I, required_files: &[S]) -> bool
where
    I: IntoIterator,
    I::Item: SubmittedFile,
    S: AsRef<str>,
{
    if required_files.is_empty() {
        return true;
    }

    let rows: Vec<I::Item> = submitted.into_iter().collect();
    let names: HashSet<&str> = rows.iter().map(SubmittedFile::submitted_name).collect();

    required_files
        .iter()
        .all(|required| names.contains(required.as_ref()))
}

/// Completeness of `submissions` against `assignment`.
pub fn is_complete_for(submissions: &[Submission], assignment: &Assignment) -> bool {
    is_complete_submission(submissions, &assignment.required_files)
}

/// Highest version among `submissions`, optionally limited to one file.
///
/// `None` when nothing matches.
pub fn latest_version(submissions: &[Submission], file_name: Option<&str>) -> Option<SubmissionVersion> {
    submissions
        .iter()
        .filter(|s| file_name.is_none_or(|name| s.file_name == name))
        .map(|s| s.version)
        .max()
        .map(SubmissionVersion)
}

/// Sorted, deduplicated versions per file name.
pub fn versions_by_file(submissions: &[Submission]) -> BTreeMap<String, Vec<u32>> {
    let mut out: BTreeMap<String, Vec<u32>> = BTreeMap::new();
    for submission in submissions {
        out.entry(submission.file_name.clone())
            .or_default()
            .push(submission.version);
    }
    for versions in out.values_mut() {
        versions.sort_unstable();
        versions.dedup();
    }
    out
}

/// The assignment `assignment_id` of `class`.
pub fn find_assignment<'a>(class: &'a AutograderClass, assignment_id: &str) -> Result<&'a Assignment> {
    class
        .assignment(assignment_id)
        .ok_or_else(|| ClientError::AssignmentNotInClass {
            assignment_id: assignment_id.to_string(),
            class_id:      class.id.clone(),
        })
}

/// Drops empty-folder marker entries from a listing.
pub fn filter_placeholders(objects: Vec<StoredObject>) -> Vec<StoredObject> {
    objects
        .into_iter()
        .filter(|o| !o.is_placeholder())
        .collect()
}
