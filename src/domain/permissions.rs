//! The fixed vocabulary of capabilities a role can be granted.
//!
//! Action names are the only identifiers authorization checks ever look at.
//! The seeding step and every handler refer to [`Action`] variants, never to
//! ad hoc strings.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

macro_rules! actions {
    ($( $variant:ident => ($name:literal, $description:literal), )+) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Action {
            $( $variant, )+
        }

        impl Action {
            pub const ALL: &'static [Action] = &[ $( Action::$variant, )+ ];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $( Action::$variant => $name, )+
                }
            }

            pub fn description(&self) -> &'static str {
                match self {
                    $( Action::$variant => $description, )+
                }
            }
        }

        impl FromStr for Action {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $name => Ok(Action::$variant), )+
                    _ => Err(format!("Unknown permission action: {}", s)),
                }
            }
        }
    };
}

actions! {
    // User management
    ViewPendingUsers => ("view_pending_users", "View users pending approval"),
    ApproveUsers => ("approve_users", "Approve or reject user registrations"),
    ViewAllUsers => ("view_all_users", "View all users"),
    ViewUserDetails => ("view_user_details", "View detailed user information"),
    UpdateUser => ("update_user", "Update user information"),
    DeleteUser => ("delete_user", "Delete users"),

    // Role management
    ViewRoles => ("view_roles", "View all roles"),
    CreateRole => ("create_role", "Create new roles"),
    UpdateRole => ("update_role", "Update roles and their permissions"),
    DeleteRole => ("delete_role", "Delete roles"),
    TransferRole => ("transfer_role", "Transfer roles between users"),

    // Posts
    CreatePost => ("create_post", "Create new posts"),
    EditOwnPost => ("edit_own_post", "Edit own posts"),
    EditAnyPost => ("edit_any_post", "Edit any post"),
    DeleteOwnPost => ("delete_own_post", "Delete own posts"),
    DeleteAnyPost => ("delete_any_post", "Delete any post"),
    ViewPosts => ("view_posts", "View posts"),

    // Comments
    CreateComment => ("create_comment", "Create comments"),
    ViewComments => ("view_comments", "View comments"),
    EditAnyComment => ("edit_any_comment", "Edit any comment"),
    DeleteAnyComment => ("delete_any_comment", "Delete any comment"),

    // Categories
    ViewCategories => ("view_categories", "View categories"),
    CreateCategory => ("create_category", "Create new categories"),
    UpdateCategory => ("update_category", "Update categories"),
    DeleteCategory => ("delete_category", "Delete categories"),

    // Books
    ViewBooks => ("view_books", "View book list"),
    ManageBooks => ("manage_books", "Add, edit, and delete books"),
    BorrowBook => ("borrow_book", "Borrow books"),
    ReturnBook => ("return_book", "Return borrowed books"),

    // Fees
    ViewFees => ("view_fees", "View all fees"),
    ManageFees => ("manage_fees", "Create and update fees"),
    ViewOwnFees => ("view_own_fees", "View own fee records"),
    PayFee => ("pay_fee", "Pay fees"),

    // Events
    ViewEvents => ("view_events", "View events"),
    ManageEvents => ("manage_events", "Create, edit, and delete events"),

    // Attendance
    ViewAttendance => ("view_attendance", "View attendance records"),
    ManageAttendance => ("manage_attendance", "Manage attendance records"),
    CheckIn => ("check_in", "Check in for events"),
    ViewOwnAttendance => ("view_own_attendance", "View own attendance records"),

    // Evaluations
    ViewEvaluations => ("view_evaluations", "View all evaluations"),
    ManageEvaluations => ("manage_evaluations", "Create and edit evaluations"),
    ViewOwnEvaluations => ("view_own_evaluations", "View own evaluation records"),

    // Files
    UploadFile => ("upload_file", "Upload files"),
    ViewFiles => ("view_files", "View all files"),
    ViewOwnFiles => ("view_own_files", "View own uploaded files"),
    DeleteOwnFile => ("delete_own_file", "Delete own uploaded files"),
    DeleteAnyFile => ("delete_any_file", "Delete any file"),
    DownloadFile => ("download_file", "Download files"),

    // Awards
    ViewAllAwards => ("view_all_awards", "View every member's awards"),
    CreateOwnAward => ("create_own_award", "Record own awards"),
    UpdateOwnAward => ("update_own_award", "Edit own awards"),
    UpdateAnyAward => ("update_any_award", "Edit any award"),
    DeleteOwnAward => ("delete_own_award", "Delete own awards"),
    DeleteAnyAward => ("delete_any_award", "Delete any award"),

    // Education history
    ViewAllEducation => ("view_all_education", "View every member's education history"),
    CreateOwnEducation => ("create_own_education", "Record own education history"),
    UpdateOwnEducation => ("update_own_education", "Edit own education history"),
    UpdateAnyEducation => ("update_any_education", "Edit any education record"),
    DeleteOwnEducation => ("delete_own_education", "Delete own education history"),
    DeleteAnyEducation => ("delete_any_education", "Delete any education record"),

    // Cleaning duty
    ViewCleanings => ("view_cleanings", "View cleaning duty rosters"),
    CreateCleaning => ("create_cleaning", "Create cleaning duty rosters"),
    UpdateCleaning => ("update_cleaning", "Update cleaning duty rosters"),
    DeleteCleaning => ("delete_cleaning", "Delete cleaning duty rosters"),
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Action {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Action {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// The three reserved roles. They are created at bootstrap and can never be
/// deleted; the admin role can never be renamed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemRole {
    Admin,
    Member,
    NonMember,
}

impl SystemRole {
    pub const ALL: [SystemRole; 3] = [SystemRole::Admin, SystemRole::Member, SystemRole::NonMember];

    pub fn name(&self) -> &'static str {
        match self {
            SystemRole::Admin => "admin",
            SystemRole::Member => "member",
            SystemRole::NonMember => "non-member",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            SystemRole::Admin => "Administrator with full permissions",
            SystemRole::Member => "Regular member",
            SystemRole::NonMember => "Non-member with limited view permissions",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.name() == name)
    }

    pub fn is_reserved(name: &str) -> bool {
        Self::from_name(name).is_some()
    }

    /// Grants applied when the role is first created.
    pub fn default_grants(&self) -> Vec<Action> {
        use Action::*;
        match self {
            SystemRole::Admin => Action::ALL.to_vec(),
            SystemRole::Member => vec![
                CreatePost,
                EditOwnPost,
                DeleteOwnPost,
                CreateComment,
                ViewPosts,
                ViewComments,
                ViewCategories,
                ViewBooks,
                BorrowBook,
                ReturnBook,
                ViewOwnFees,
                PayFee,
                ViewEvents,
                CheckIn,
                ViewOwnAttendance,
                ViewOwnEvaluations,
                UploadFile,
                ViewOwnFiles,
                DeleteOwnFile,
                DownloadFile,
                CreateOwnAward,
                UpdateOwnAward,
                DeleteOwnAward,
                CreateOwnEducation,
                UpdateOwnEducation,
                DeleteOwnEducation,
                ViewCleanings,
            ],
            SystemRole::NonMember => vec![
                ViewPosts,
                ViewComments,
                ViewCategories,
                ViewBooks,
                ViewEvents,
            ],
        }
    }
}
