/// Integration tests exercising the diary through its tools and storage
mod backup_workflow;
mod diary_workflow;
