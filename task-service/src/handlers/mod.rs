pub mod tasks;

pub use tasks::{
    create_subtask, create_task, get_task, list_subtasks, list_tasks, list_tasks_for_user,
    update_task,
};
