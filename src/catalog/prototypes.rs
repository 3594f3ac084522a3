//! Linux syscall prototypes, one per line: `name: return_type (type arg, ...)`.

pub(super) const PROTOTYPES: &str = r#"
read: ssize_t (unsigned int fd, char *buf, size_t count)
write: ssize_t (unsigned int fd, const char *buf, size_t count)
open: long (const char *filename, int flags, umode_t mode)
close: int (unsigned int fd)
stat: int (const char *filename, struct stat *statbuf)
fstat: int (unsigned int fd, struct stat *statbuf)
lstat: int (const char *filename, struct stat *statbuf)
poll: int (struct pollfd *ufds, unsigned int nfds, int timeout)
lseek: off_t (unsigned int fd, off_t offset, unsigned int whence)
mmap: void * (void *addr, size_t len, int prot, int flags, int fd, off_t off)
mprotect: int (void *start, size_t len, int prot)
munmap: int (void *addr, size_t len)
brk: void * (void *brk)
rt_sigaction: int (int sig, const struct sigaction *act, struct sigaction *oact, size_t sigsetsize)
rt_sigprocmask: int (int how, sigset_t *nset, sigset_t *oset, size_t sigsetsize)
rt_sigreturn: int ()
ioctl: int (unsigned int fd, unsigned int cmd, unsigned long arg)
pread64: ssize_t (unsigned int fd, char *buf, size_t count, loff_t pos)
pwrite64: ssize_t (unsigned int fd, const char *buf, size_t count, loff_t pos)
readv: ssize_t (unsigned long fd, const struct iovec *vec, unsigned long vlen)
writev: ssize_t (unsigned long fd, const struct iovec *vec, unsigned long vlen)
access: int (const char *filename, int mode)
pipe: int (int *fildes)
select: int (int n, fd_set *inp, fd_set *outp, fd_set *exp, struct timeval *tvp)
sched_yield: int ()
mremap: void * (void *addr, size_t old_len, size_t new_len, unsigned long flags, void *new_addr)
msync: int (void *start, size_t len, int flags)
mincore: int (void *start, size_t len, unsigned char *vec)
madvise: int (void *start, size_t len_in, int behavior)
shmget: int (key_t key, size_t size, int shmflg)
shmat: void * (int shmid, char *shmaddr, int shmflg)
shmctl: int (int shmid, int cmd, struct shmid_ds *buf)
dup: int (unsigned int fildes)
dup2: int (unsigned int oldfd, unsigned int newfd)
pause: int ()
nanosleep: int (struct timespec *rqtp, struct timespec *rmtp)
getitimer: int (int which, struct itimerval *value)
alarm: unsigned int (unsigned int seconds)
setitimer: int (int which, struct itimerval *value, struct itimerval *ovalue)
getpid: pid_t ()
sendfile: ssize_t (int out_fd, int in_fd, loff_t *offset, size_t count)
socket: int (int family, int type, int protocol)
connect: int (int fd, struct sockaddr *uservaddr, int addrlen)
accept: int (int fd, struct sockaddr *upeer_sockaddr, int *upeer_addrlen)
sendto: ssize_t (int fd, const void *buff, size_t len, unsigned int flags, struct sockaddr *addr, int addr_len)
recvfrom: ssize_t (int fd, void *ubuf, size_t size, unsigned int flags, struct sockaddr *addr, int *addr_len)
sendmsg: ssize_t (int fd, struct msghdr *msg, unsigned int flags)
recvmsg: ssize_t (int fd, struct msghdr *msg, unsigned int flags)
shutdown: int (int fd, int how)
bind: int (int fd, struct sockaddr *umyaddr, int addrlen)
listen: int (int fd, int backlog)
getsockname: int (int fd, struct sockaddr *usockaddr, int *usockaddr_len)
getpeername: int (int fd, struct sockaddr *usockaddr, int *usockaddr_len)
socketpair: int (int family, int type, int protocol, int *usockvec)
setsockopt: int (int fd, int level, int optname, char *optval, int optlen)
getsockopt: int (int fd, int level, int optname, char *optval, int *optlen)
clone: long (unsigned long clone_flags, unsigned long newsp, int *parent_tidptr, int *child_tidptr, unsigned long tls)
fork: pid_t ()
vfork: pid_t ()
execve: int (const char *filename, const char *const *argv, const char *const *envp)
exit: void (int error_code)
wait4: pid_t (pid_t upid, int *stat_addr, int options, struct rusage *ru)
kill: int (pid_t pid, int sig)
uname: int (struct new_utsname *name)
semget: int (key_t key, int nsems, int semflg)
semop: int (int semid, struct sembuf *tsops, unsigned int nsops)
semctl: int (int semid, int semnum, int cmd, unsigned long arg)
shmdt: int (char *shmaddr)
msgget: int (key_t key, int msgflg)
msgsnd: int (int msqid, struct msgbuf *msgp, size_t msgsz, int msgflg)
msgrcv: ssize_t (int msqid, struct msgbuf *msgp, size_t msgsz, long msgtyp, int msgflg)
msgctl: int (int msqid, int cmd, struct msqid_ds *buf)
fcntl: int (unsigned int fd, unsigned int cmd, unsigned long arg)
flock: int (unsigned int fd, unsigned int cmd)
fsync: int (unsigned int fd)
fdatasync: int (unsigned int fd)
truncate: int (const char *path, long length)
ftruncate: int (unsigned int fd, unsigned long length)
getdents: int (unsigned int fd, struct linux_dirent *dirent, unsigned int count)
getcwd: int (char *buf, unsigned long size)
chdir: int (const char *filename)
fchdir: int (unsigned int fd)
rename: int (const char *oldname, const char *newname)
mkdir: int (const char *pathname, umode_t mode)
rmdir: int (const char *pathname)
creat: long (const char *pathname, umode_t mode)
link: int (const char *oldname, const char *newname)
unlink: int (const char *pathname)
symlink: int (const char *oldname, const char *newname)
readlink: ssize_t (const char *path, char *buf, int bufsiz)
chmod: int (const char *filename, umode_t mode)
fchmod: int (unsigned int fd, umode_t mode)
chown: int (const char *filename, uid_t user, gid_t group)
fchown: int (unsigned int fd, uid_t user, gid_t group)
lchown: int (const char *filename, uid_t user, gid_t group)
umask: mode_t (int mask)
gettimeofday: int (struct timeval *tv, struct timezone *tz)
getrlimit: int (unsigned int resource, struct rlimit *rlim)
getrusage: int (int who, struct rusage *ru)
sysinfo: int (struct sysinfo *info)
times: clock_t (struct tms *tbuf)
ptrace: long (long request, long pid, unsigned long addr, unsigned long data)
getuid: uid_t ()
syslog: int (int type, char *buf, int len)
getgid: gid_t ()
setuid: int (uid_t uid)
setgid: int (gid_t gid)
geteuid: uid_t ()
getegid: gid_t ()
setpgid: int (pid_t pid, pid_t pgid)
getppid: pid_t ()
getpgrp: pid_t ()
setsid: pid_t ()
setreuid: int (uid_t ruid, uid_t euid)
setregid: int (gid_t rgid, gid_t egid)
getgroups: int (int gidsetsize, gid_t *grouplist)
setgroups: int (int gidsetsize, gid_t *grouplist)
setresuid: int (uid_t ruid, uid_t euid, uid_t suid)
getresuid: int (uid_t *ruidp, uid_t *euidp, uid_t *suidp)
setresgid: int (gid_t rgid, gid_t egid, gid_t sgid)
getresgid: int (gid_t *rgidp, gid_t *egidp, gid_t *sgidp)
getpgid: pid_t (pid_t pid)
setfsuid: int (uid_t uid)
setfsgid: int (gid_t gid)
getsid: pid_t (pid_t pid)
capget: int (cap_user_header_t header, cap_user_data_t dataptr)
capset: int (cap_user_header_t header, const cap_user_data_t data)
rt_sigpending: int (sigset_t *uset, size_t sigsetsize)
rt_sigtimedwait: int (const sigset_t *uthese, siginfo_t *uinfo, const struct timespec *uts, size_t sigsetsize)
rt_sigqueueinfo: int (pid_t pid, int sig, siginfo_t *uinfo)
rt_sigsuspend: int (sigset_t *unewset, size_t sigsetsize)
sigaltstack: int (const stack_t *uss, stack_t *uoss)
utime: int (char *filename, struct utimbuf *times)
mknod: int (const char *filename, umode_t mode, unsigned int dev)
personality: int (unsigned int personality)
ustat: int (unsigned int dev, struct ustat *ubuf)
statfs: int (const char *pathname, struct statfs *buf)
fstatfs: int (unsigned int fd, struct statfs *buf)
sysfs: int (int option, unsigned long arg1, unsigned long arg2)
getpriority: int (int which, int who)
setpriority: int (int which, int who, int niceval)
sched_setparam: int (pid_t pid, struct sched_param *param)
sched_getparam: int (pid_t pid, struct sched_param *param)
sched_setscheduler: int (pid_t pid, int policy, struct sched_param *param)
sched_getscheduler: int (pid_t pid)
sched_get_priority_max: int (int policy)
sched_get_priority_min: int (int policy)
sched_rr_get_interval: int (pid_t pid, struct timespec *interval)
mlock: int (unsigned long start, size_t len)
munlock: int (unsigned long start, size_t len)
mlockall: int (int flags)
munlockall: int ()
vhangup: int ()
modify_ldt: int (int func, void *ptr, unsigned long bytecount)
pivot_root: int (const char *new_root, const char *put_old)
prctl: int (int option, unsigned long arg2, unsigned long arg3, unsigned long arg4, unsigned long arg5)
arch_prctl: int (int code, unsigned long addr)
adjtimex: int (struct timex *txc_p)
setrlimit: int (unsigned int resource, struct rlimit *rlim)
chroot: int (const char *filename)
sync: void ()
acct: int (const char *name)
settimeofday: int (struct timeval *tv, struct timezone *tz)
mount: int (char *dev_name, char *dir_name, char *type, unsigned long flags, void *data)
umount2: int (char *name, int flags)
swapon: int (const char *specialfile, int swap_flags)
swapoff: int (const char *specialfile)
reboot: int (int magic1, int magic2, unsigned int cmd, void *arg)
sethostname: int (char *name, int len)
setdomainname: int (char *name, int len)
iopl: int (unsigned int level)
ioperm: int (unsigned long from, unsigned long num, int turn_on)
init_module: int (void *umod, unsigned long len, const char *uargs)
delete_module: int (const char *name_user, unsigned int flags)
quotactl: int (unsigned int cmd, const char *special, qid_t id, void *addr)
gettid: pid_t ()
readahead: ssize_t (int fd, loff_t offset, size_t count)
setxattr: int (const char *pathname, const char *name, const void *value, size_t size, int flags)
lsetxattr: int (const char *pathname, const char *name, const void *value, size_t size, int flags)
fsetxattr: int (int fd, const char *name, const void *value, size_t size, int flags)
getxattr: ssize_t (const char *pathname, const char *name, void *value, size_t size)
lgetxattr: ssize_t (const char *pathname, const char *name, void *value, size_t size)
fgetxattr: ssize_t (int fd, const char *name, void *value, size_t size)
listxattr: ssize_t (const char *pathname, char *list, size_t size)
llistxattr: ssize_t (const char *pathname, char *list, size_t size)
flistxattr: ssize_t (int fd, char *list, size_t size)
removexattr: int (const char *pathname, const char *name)
lremovexattr: int (const char *pathname, const char *name)
fremovexattr: int (int fd, const char *name)
tkill: int (pid_t pid, int sig)
time: time_t (time_t *tloc)
futex: int (u32 *uaddr, int op, u32 val, struct timespec *utime, u32 *uaddr2, u32 val3)
sched_setaffinity: int (pid_t pid, unsigned int len, unsigned long *user_mask_ptr)
sched_getaffinity: int (pid_t pid, unsigned int len, unsigned long *user_mask_ptr)
set_thread_area: int (struct user_desc *u_info)
io_setup: long (unsigned int nr_events, aio_context_t *ctxp)
io_destroy: long (aio_context_t ctx)
io_getevents: long (aio_context_t ctx_id, long min_nr, long nr, struct io_event *events, struct timespec *timeout)
io_submit: long (aio_context_t ctx_id, long nr, struct iocb **iocbpp)
io_cancel: long (aio_context_t ctx_id, struct iocb *iocb, struct io_event *result)
get_thread_area: int (struct user_desc *u_info)
epoll_create: int (int size)
remap_file_pages: int (unsigned long start, unsigned long size, unsigned long prot, unsigned long pgoff, unsigned long flags)
getdents64: int (unsigned int fd, struct linux_dirent64 *dirent, unsigned int count)
set_tid_address: pid_t (int *tidptr)
restart_syscall: long ()
semtimedop: int (int semid, struct sembuf *tsops, unsigned int nsops, const struct timespec *timeout)
fadvise64: int (int fd, loff_t offset, size_t len, int advice)
timer_create: int (clockid_t which_clock, struct sigevent *timer_event_spec, timer_t *created_timer_id)
timer_settime: int (timer_t timer_id, int flags, const struct itimerspec *new_setting, struct itimerspec *old_setting)
timer_gettime: int (timer_t timer_id, struct itimerspec *setting)
timer_getoverrun: int (timer_t timer_id)
timer_delete: int (timer_t timer_id)
clock_settime: int (clockid_t which_clock, const struct timespec *tp)
clock_gettime: int (clockid_t which_clock, struct timespec *tp)
clock_getres: int (clockid_t which_clock, struct timespec *tp)
clock_nanosleep: int (clockid_t which_clock, int flags, const struct timespec *rqtp, struct timespec *rmtp)
exit_group: void (int error_code)
epoll_wait: int (int epfd, struct epoll_event *events, int maxevents, int timeout)
epoll_ctl: int (int epfd, int op, int fd, struct epoll_event *event)
tgkill: int (pid_t tgid, pid_t pid, int sig)
utimes: int (char *filename, struct timeval *utimes)
mbind: long (unsigned long start, unsigned long len, unsigned long mode, const unsigned long *nmask, unsigned long maxnode, unsigned int flags)
set_mempolicy: long (int mode, const unsigned long *nmask, unsigned long maxnode)
get_mempolicy: long (int *policy, unsigned long *nmask, unsigned long maxnode, unsigned long addr, unsigned long flags)
mq_open: int (const char *u_name, int oflag, umode_t mode, struct mq_attr *u_attr)
mq_unlink: int (const char *u_name)
mq_timedsend: int (mqd_t mqdes, const char *u_msg_ptr, size_t msg_len, unsigned int msg_prio, const struct timespec *u_abs_timeout)
mq_timedreceive: ssize_t (mqd_t mqdes, char *u_msg_ptr, size_t msg_len, unsigned int *u_msg_prio, const struct timespec *u_abs_timeout)
mq_notify: int (mqd_t mqdes, const struct sigevent *u_notification)
mq_getsetattr: int (mqd_t mqdes, const struct mq_attr *u_mqstat, struct mq_attr *u_omqstat)
kexec_load: long (unsigned long entry, unsigned long nr_segments, struct kexec_segment *segments, unsigned long flags)
waitid: int (int which, pid_t upid, struct siginfo *infop, int options, struct rusage *ru)
add_key: key_serial_t (const char *_type, const char *_description, const void *_payload, size_t plen, key_serial_t ringid)
request_key: key_serial_t (const char *_type, const char *_description, const char *_callout_info, key_serial_t destringid)
keyctl: long (int option, unsigned long arg2, unsigned long arg3, unsigned long arg4, unsigned long arg5)
ioprio_set: int (int which, int who, int ioprio)
ioprio_get: int (int which, int who)
inotify_init: int ()
inotify_add_watch: int (int fd, const char *pathname, u32 mask)
inotify_rm_watch: int (int fd, s32 wd)
migrate_pages: long (pid_t pid, unsigned long maxnode, const unsigned long *old_nodes, const unsigned long *new_nodes)
openat: long (int dfd, const char *filename, int flags, umode_t mode)
mkdirat: int (int dfd, const char *pathname, umode_t mode)
mknodat: int (int dfd, const char *filename, umode_t mode, unsigned int dev)
fchownat: int (int dfd, const char *filename, uid_t user, gid_t group, int flag)
futimesat: int (int dfd, const char *filename, struct timeval *utimes)
newfstatat: int (int dfd, const char *filename, struct stat *statbuf, int flag)
unlinkat: int (int dfd, const char *pathname, int flag)
renameat: int (int olddfd, const char *oldname, int newdfd, const char *newname)
linkat: int (int olddfd, const char *oldname, int newdfd, const char *newname, int flags)
symlinkat: int (const char *oldname, int newdfd, const char *newname)
readlinkat: ssize_t (int dfd, const char *pathname, char *buf, int bufsiz)
fchmodat: int (int dfd, const char *filename, umode_t mode)
faccessat: int (int dfd, const char *filename, int mode)
pselect6: int (int n, fd_set *inp, fd_set *outp, fd_set *exp, struct timespec *tsp, void *sig)
ppoll: int (struct pollfd *ufds, unsigned int nfds, struct timespec *tsp, const sigset_t *sigmask, size_t sigsetsize)
unshare: int (unsigned long unshare_flags)
set_robust_list: long (struct robust_list_head *head, size_t len)
get_robust_list: long (int pid, struct robust_list_head **head_ptr, size_t *len_ptr)
splice: ssize_t (int fd_in, loff_t *off_in, int fd_out, loff_t *off_out, size_t len, unsigned int flags)
tee: ssize_t (int fdin, int fdout, size_t len, unsigned int flags)
sync_file_range: int (int fd, loff_t offset, loff_t nbytes, unsigned int flags)
vmsplice: ssize_t (int fd, const struct iovec *uiov, unsigned long nr_segs, unsigned int flags)
move_pages: long (pid_t pid, unsigned long nr_pages, const void **pages, const int *nodes, int *status, int flags)
utimensat: int (int dfd, const char *filename, struct timespec *utimes, int flags)
epoll_pwait: int (int epfd, struct epoll_event *events, int maxevents, int timeout, const sigset_t *sigmask, size_t sigsetsize)
signalfd: int (int ufd, sigset_t *user_mask, size_t sizemask)
timerfd_create: int (int clockid, int flags)
eventfd: int (unsigned int count)
fallocate: int (int fd, int mode, loff_t offset, loff_t len)
timerfd_settime: int (int ufd, int flags, const struct itimerspec *utmr, struct itimerspec *otmr)
timerfd_gettime: int (int ufd, struct itimerspec *otmr)
accept4: int (int fd, struct sockaddr *upeer_sockaddr, int *upeer_addrlen, int flags)
signalfd4: int (int ufd, sigset_t *user_mask, size_t sizemask, int flags)
eventfd2: int (unsigned int count, int flags)
epoll_create1: int (int flags)
dup3: int (unsigned int oldfd, unsigned int newfd, int flags)
pipe2: int (int *fildes, int flags)
inotify_init1: int (int flags)
preadv: ssize_t (unsigned long fd, const struct iovec *vec, unsigned long vlen, unsigned long pos_l, unsigned long pos_h)
pwritev: ssize_t (unsigned long fd, const struct iovec *vec, unsigned long vlen, unsigned long pos_l, unsigned long pos_h)
rt_tgsigqueueinfo: int (pid_t tgid, pid_t pid, int sig, siginfo_t *uinfo)
perf_event_open: int (struct perf_event_attr *attr_uptr, pid_t pid, int cpu, int group_fd, unsigned long flags)
recvmmsg: int (int fd, struct mmsghdr *mmsg, unsigned int vlen, unsigned int flags, struct timespec *timeout)
fanotify_init: int (unsigned int flags, unsigned int event_f_flags)
fanotify_mark: int (int fanotify_fd, unsigned int flags, u64 mask, int dfd, const char *pathname)
prlimit64: int (pid_t pid, unsigned int resource, const struct rlimit64 *new_rlim, struct rlimit64 *old_rlim)
name_to_handle_at: int (int dfd, const char *name, struct file_handle *handle, int *mnt_id, int flag)
open_by_handle_at: int (int mountdirfd, struct file_handle *handle, int flags)
clock_adjtime: int (clockid_t which_clock, struct timex *tx)
syncfs: int (int fd)
sendmmsg: int (int fd, struct mmsghdr *mmsg, unsigned int vlen, unsigned int flags)
setns: int (int fd, int nstype)
getcpu: int (unsigned int *cpup, unsigned int *nodep, struct getcpu_cache *unused)
process_vm_readv: ssize_t (pid_t pid, const struct iovec *lvec, unsigned long liovcnt, const struct iovec *rvec, unsigned long riovcnt, unsigned long flags)
process_vm_writev: ssize_t (pid_t pid, const struct iovec *lvec, unsigned long liovcnt, const struct iovec *rvec, unsigned long riovcnt, unsigned long flags)
kcmp: int (pid_t pid1, pid_t pid2, int type, unsigned long idx1, unsigned long idx2)
finit_module: int (int fd, const char *uargs, int flags)
sched_setattr: int (pid_t pid, struct sched_attr *uattr, unsigned int flags)
sched_getattr: int (pid_t pid, struct sched_attr *uattr, unsigned int size, unsigned int flags)
renameat2: int (int olddfd, const char *oldname, int newdfd, const char *newname, unsigned int flags)
seccomp: int (unsigned int op, unsigned int flags, void *uargs)
getrandom: ssize_t (char *buf, size_t count, unsigned int flags)
memfd_create: int (const char *uname, unsigned int flags)
kexec_file_load: long (int kernel_fd, int initrd_fd, unsigned long cmdline_len, const char *cmdline_ptr, unsigned long flags)
bpf: int (int cmd, union bpf_attr *uattr, unsigned int size)
execveat: int (int fd, const char *filename, const char *const *argv, const char *const *envp, int flags)
userfaultfd: int (int flags)
membarrier: int (int cmd, unsigned int flags, int cpu_id)
mlock2: int (unsigned long start, size_t len, int flags)
copy_file_range: ssize_t (int fd_in, loff_t *off_in, int fd_out, loff_t *off_out, size_t len, unsigned int flags)
preadv2: ssize_t (unsigned long fd, const struct iovec *vec, unsigned long vlen, unsigned long pos_l, unsigned long pos_h, rwf_t flags)
pwritev2: ssize_t (unsigned long fd, const struct iovec *vec, unsigned long vlen, unsigned long pos_l, unsigned long pos_h, rwf_t flags)
pkey_mprotect: int (unsigned long start, size_t len, unsigned long prot, int pkey)
pkey_alloc: int (unsigned long flags, unsigned long init_val)
pkey_free: int (int pkey)
statx: int (int dfd, const char *filename, unsigned int flags, unsigned int mask, struct statx *buffer)
io_pgetevents: long (aio_context_t ctx_id, long min_nr, long nr, struct io_event *events, struct timespec *timeout, const struct __aio_sigset *usig)
rseq: int (struct rseq *rseq, u32 rseq_len, int flags, u32 sig)
pidfd_send_signal: int (int pidfd, int sig, siginfo_t *info, unsigned int flags)
io_uring_setup: long (u32 entries, struct io_uring_params *params)
io_uring_enter: long (unsigned int fd, u32 to_submit, u32 min_complete, u32 flags, const void *argp, size_t argsz)
io_uring_register: long (unsigned int fd, unsigned int opcode, void *arg, unsigned int nr_args)
open_tree: int (int dfd, const char *filename, unsigned int flags)
move_mount: int (int from_dfd, const char *from_pathname, int to_dfd, const char *to_pathname, unsigned int flags)
fsopen: int (const char *_fs_name, unsigned int flags)
fsconfig: int (int fd, unsigned int cmd, const char *_key, const void *_value, int aux)
fsmount: int (int fs_fd, unsigned int flags, unsigned int attr_flags)
fspick: int (int dfd, const char *path, unsigned int flags)
pidfd_open: int (pid_t pid, unsigned int flags)
clone3: long (struct clone_args *uargs, size_t size)
close_range: int (unsigned int fd, unsigned int max_fd, unsigned int flags)
openat2: long (int dfd, const char *filename, struct open_how *how, size_t usize)
pidfd_getfd: int (int pidfd, int fd, unsigned int flags)
faccessat2: int (int dfd, const char *filename, int mode, int flags)
process_madvise: ssize_t (int pidfd, const struct iovec *vec, size_t vlen, int behavior, unsigned int flags)
epoll_pwait2: int (int epfd, struct epoll_event *events, int maxevents, const struct timespec *timeout, const sigset_t *sigmask, size_t sigsetsize)
"#;
