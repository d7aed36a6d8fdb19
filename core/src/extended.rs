//! Convenience operations built from more than one remote call.

use tracing::instrument;

use crate::error::MoodleError;
use crate::model::{Course, Section};
use crate::session::MoodleSession;

impl MoodleSession {
    /// Courses the current user is enrolled in, optionally narrowed by
    /// `filter`. Resolves the user id first if it is not known yet.
    #[instrument(skip(self, filter))]
    pub fn fetch_courses(
        &self,
        filter: Option<&dyn Fn(&Course) -> bool>,
    ) -> Result<Vec<Course>, MoodleError> {
        let user_id = self.user_id()?;
        let courses = self.core_enrol_get_users_courses(user_id)?;
        Ok(match filter {
            Some(keep) => courses.into_iter().filter(|c| keep(c)).collect(),
            None => courses,
        })
    }

    /// Contents of one course.
    pub fn fetch_contents(&self, course_id: i64) -> Result<Vec<Section>, MoodleError> {
        self.core_course_get_contents(course_id)
    }
}
