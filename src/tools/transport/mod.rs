pub mod tool_router;
